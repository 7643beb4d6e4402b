use optguard::Options;

#[derive(Options)]
#[options(key = "")]
struct Settings;

fn main() {
    let _settings = Settings;
}

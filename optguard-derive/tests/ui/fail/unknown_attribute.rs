use optguard::Options;

#[derive(Options)]
#[options(name = "App")]
struct Settings;

fn main() {
    let _settings = Settings;
}

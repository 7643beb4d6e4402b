use optguard::Options;

#[derive(Options)]
#[options(key = 42)]
struct Settings;

fn main() {
    let _settings = Settings;
}

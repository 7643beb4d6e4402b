use optguard::Options;

#[derive(Options)]
#[options(key = "App", section = "Other")]
struct Settings;

fn main() {
    let _settings = Settings;
}

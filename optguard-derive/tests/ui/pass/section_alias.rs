use optguard::Options;
use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Deserialize, Options)]
#[options(section = "App:Database")]
struct DatabaseOptions {
    host: String,
}

#[derive(Default, Serialize, Deserialize, Options)]
struct CacheOptions {
    region: String,
}

fn main() {
    assert_eq!(DatabaseOptions::KEY, Some("App:Database"));
    assert_eq!(DatabaseOptions::configuration_key(), "App:Database");
    assert_eq!(CacheOptions::configuration_key(), "CacheOptions");

    let _ = DatabaseOptions::default().host;
    let _ = CacheOptions::default().region;
}

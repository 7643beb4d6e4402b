// Derive macro example for optguard
//
// Run with: cargo run --example derive_usage --features derive

use optguard::{Configuration, Options, OptionsRegistry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Options)]
#[options(key = "Services:Search")]
struct SearchOptions {
    endpoint: String,
    timeout_ms: u64,
    replicas: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Options)]
struct FeatureFlags {
    new_ui: bool,
    beta_search: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🧩 optguard Derive Example\n");
    println!("SearchOptions binds from '{}'", SearchOptions::configuration_key());
    println!("FeatureFlags binds from '{}'\n", FeatureFlags::configuration_key());

    let config = Configuration::builder()
        .add_value(serde_json::json!({
            "Services": {
                "Search": {
                    "Endpoint": "http://search:9200",
                    "TimeoutMs": "1500",
                    "Replicas": ["search-a", "search-b"]
                }
            },
            "FeatureFlags": {"NewUi": true}
        }))
        .add_env_vars("DEMO_")
        .build()?;

    let mut registry = OptionsRegistry::new();
    registry
        .add_options::<SearchOptions>()
        .bind(config.section(SearchOptions::configuration_key()))
        .validate(|s| s.timeout_ms <= 10_000, "Search timeout must not exceed 10s")
        .validate_on_start();
    registry
        .add_options::<FeatureFlags>()
        .bind(config.section(FeatureFlags::configuration_key()));

    let provider = registry.build()?;
    println!("✅ {:?}", provider.get::<SearchOptions>()?);
    println!("✅ {:?}", provider.get::<FeatureFlags>()?);

    Ok(())
}

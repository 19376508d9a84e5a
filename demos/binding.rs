//! Deserializing a document into typed structs.
//!
//! Run with: cargo run --example binding

use serde::Deserialize;
use skopik::from_str;
use std::error::Error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Level {
    Debug,
    Info,
    Warn,
}

#[derive(Debug, Deserialize)]
struct Database {
    url: String,
    pool: u16,
    #[serde(default)]
    readonly: bool,
}

#[derive(Debug, Deserialize)]
struct Settings {
    level: Level,
    retries: u8,
    backoff: (f32, f32),
    databases: Vec<Database>,
    features: Option<Vec<String>>,
}

const SETTINGS: &str = r#"
level = info
retries = 3
backoff = (0.5f, 30.0f)

databases = [
    { url = "postgres://primary"; pool = 16 }
    { url = "postgres://replica"; pool = 8; readonly = true }
]
"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let settings: Settings = from_str(SETTINGS)?;
    println!("{:#?}\n", settings);
    println!(
        "level {:?}, {} retries, backoff {}s to {}s",
        settings.level, settings.retries, settings.backoff.0, settings.backoff.1
    );

    for db in &settings.databases {
        let mode = if db.readonly { "ro" } else { "rw" };
        println!("{} ({}, pool {})", db.url, mode, db.pool);
    }
    println!("features: {:?}", settings.features);

    // out-of-range values are reported by the target type
    match from_str::<Settings>("level = warn; retries = 300; backoff = (1f, 1f); databases = []") {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("\nrejected: {}", e),
    }

    Ok(())
}

//! Parsing a document and reading values out of the tree.
//!
//! Run with: cargo run --example simple

use skopik::{parse_str, Kind, Value};
use std::error::Error;

const CONFIG: &str = r#"
// service settings
name = "inventory"
workers = 8u
timeout = 2.5f
mask = 0xFF00u

listen:{
    host = "0.0.0.0"
    ports = [80, 443, [8]: 8080]
}

origin = (10, 20)
"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let root = parse_str(CONFIG)?;
    println!("Parsed '{}' with {} entries\n", root.name(), root.len());

    for (key, value) in &root {
        println!("  {:<8} {:<8} {}", key, value.kind(), value);
    }

    let root = Value::Scope(root);

    if let Some(workers) = root.get("workers").and_then(Value::as_u32) {
        println!("\nworkers: {}", workers);
    }

    if let Some(host) = root.lookup("listen.host").and_then(Value::as_str) {
        println!("listen.host: {}", host);
    }

    if let Some(ports) = root.lookup("listen.ports").and_then(Value::as_array) {
        let set: Vec<String> = ports
            .iter()
            .enumerate()
            .filter(|(_, v)| v.kind() != Kind::Null)
            .map(|(i, v)| format!("[{}]={}", i, v))
            .collect();
        println!("listen.ports: {} slots, set: {}", ports.len(), set.join(" "));
    }

    if let Some(origin) = root.get("origin").and_then(Value::as_tuple) {
        println!("origin: {:?} tuple of {}", origin.tuple_type(), origin.len());
    }

    Ok(())
}

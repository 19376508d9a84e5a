//! Parse a file repeatedly, report timings and dump the tree.
//!
//! Run with: cargo run --example dump -- <file.skop> [loops]
//!
//! The tree is printed only for a single loop. Set `RUST_LOG=warn` (or
//! `debug`) to see parser diagnostics.

use skopik::{parse_with_options, ParseOptions, Value};
use std::env;
use std::error::Error;
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

fn describe(value: &Value) -> String {
    match value {
        Value::Scope(scope) => summary("Scope", scope.len(), scope.name()),
        Value::Array(array) => summary("Array", array.len(), array.name()),
        Value::Tuple(tuple) => {
            let kind = tuple
                .tuple_type()
                .map_or_else(|| "Tuple".to_string(), |k| k.to_string());
            summary(&kind, tuple.len(), tuple.name())
        }
        scalar => format!("{}('{}')", scalar.kind(), scalar),
    }
}

fn summary(kind: &str, len: usize, name: &str) -> String {
    if name.is_empty() {
        format!("{kind}[{len}]")
    } else {
        format!("{kind}[{len}]({name})")
    }
}

fn dump(value: &Value, indent: usize) {
    match value {
        Value::Scope(scope) => {
            let pad = " ".repeat(indent);
            for (idx, (key, child)) in scope.iter().enumerate() {
                println!("{pad}({idx}) {key} : {}", describe(child));
                dump(child, indent + 2);
            }
        }
        Value::Array(array) => dump_items(array.as_slice(), indent),
        Value::Tuple(tuple) => dump_items(tuple.as_slice(), indent),
        _ => {}
    }
}

fn dump_items(items: &[Value], indent: usize) {
    let pad = " ".repeat(indent);
    for (idx, child) in items.iter().enumerate() {
        println!("{pad}({idx}) {}", describe(child));
        dump(child, indent + 2);
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let filename = args.next().unwrap_or_else(|| "test.skop".to_string());
    let loops: usize = match args.next() {
        Some(n) => n.parse()?,
        None => 1,
    };

    let path = Path::new(&filename);
    if !path.is_file() {
        eprintln!("Error -- file '{}' does not exist!", filename);
        process::exit(1);
    }

    let name = path
        .file_stem()
        .map_or_else(|| filename.clone(), |s| s.to_string_lossy().into_owned());
    let buffer = std::fs::read(path)?;
    let options = ParseOptions::new().with_name(name);

    println!("Running {} tests on '{}'...", loops, path.display());

    let mut startup = Duration::ZERO;
    let mut timer = Instant::now();
    for i in 0..loops.max(1) {
        if i == 1 {
            startup = timer.elapsed();
            println!("Startup impact: {:.3}ms", millis(startup));
            timer = Instant::now();
        }

        let root = parse_with_options(buffer.as_slice(), &options)?;
        if loops <= 1 {
            dump(&Value::Scope(root), 0);
        }
    }
    let elapsed = timer.elapsed();

    println!("\nResults (+/- startup):");
    let runs = loops.max(1) as f64;
    for (label, total) in [("(+):", elapsed + startup), ("(-):", elapsed)] {
        println!(
            "  {} {:.3}ms, average: {:.4}ms",
            label,
            millis(total),
            millis(total) / runs
        );
    }

    Ok(())
}

//! A simple example demonstrating how to use the microuri-rs library to parse URIs.
//!
//! Run with `RUST_LOG=trace` to see the parser's state transitions.

use microuri_rs::{QueryConfig, Scanner, Uri};

fn main() {
    env_logger::init();

    // Example URI
    let uri = Uri::new("https://example.com:8443/search?q=caf%C3%A9&tag=a&tag=b&note=a+b");

    println!("Successfully parsed URI:");
    println!("Scheme: {:?}", uri.scheme().map(|s| s.to_string()));
    println!("Host: {:?}", uri.host());
    println!("Port: {:?}", uri.port());
    println!("Path: {}", uri.path());
    println!("Query: {:?}", uri.query());
    println!("Parameters:");
    for (name, value) in &uri.query_parameters() {
        println!("  {}: {}", name, value);
    }

    println!("Form parameters:");
    for (name, value) in &uri.query_parameters_with(&QueryConfig::form()) {
        println!("  {}: {}", name, value);
    }

    // Example with a bare path
    let path_only = Uri::new("/just/a/path");
    println!("\nBare path: scheme={:?} path={}", path_only.scheme(), path_only.path());

    // Example with a failing scan
    let mut scanner = Scanner::new("key=value");
    match scanner.take_until(';') {
        Ok(section) => {
            println!("\nUnexpectedly found a separator after {}", section);
        }
        Err(err) => {
            println!("\nExpected error scanning for ';': {}", err);
            println!("Cursor is still at byte {}", scanner.position());
        }
    }

    // Example with invalid UTF-8
    match Uri::from_bytes(vec![b'/', 0xFF]) {
        Ok(_) => println!("\nUnexpectedly accepted invalid UTF-8!"),
        Err(err) => println!("\nExpected error reading bytes: {}", err),
    }
}

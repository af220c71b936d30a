//! Basic usage example for singleton-container.
//!
//! Demonstrates:
//! - Declaring a process-wide container and initializing it
//! - Registering with `register_ref` (default value) and `register_ref_with`
//! - Reading registration statuses
//! - Retrieving values with `assign_ref()` (returns `Arc<T>`)
//! - Handling missing types and type-erased registration errors
//!
//! Run with: `RUST_LOG=singleton_container=trace cargo run --example basic_usage`

use singleton_container::{define_container, ProviderEntry};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Declare a process-wide container for this example
define_container!(app);

#[derive(Default)]
struct Foo {
    hits: u32,
}

struct Bar {
    name: String,
}

#[derive(Debug)]
struct Baz;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    println!("=== singleton-container: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Using the container before init()
    // -------------------------------------------------------------------------
    println!("1. Registering before init()...");

    match app::register_ref::<Foo>() {
        Ok(status) => println!("   Unexpected: {}", status),
        Err(e) => println!("   Error (expected): {} [{}]", e, e.status()),
    }

    // -------------------------------------------------------------------------
    // 2. Initialize once
    // -------------------------------------------------------------------------
    println!("\n2. Initializing...");

    println!("   init() = {}", app::init());
    println!("   init() = {} (already initialized)", app::init());

    // -------------------------------------------------------------------------
    // 3. Register
    // -------------------------------------------------------------------------
    println!("\n3. Registering Foo (default) and Bar (initial value)...");

    for status in [
        app::register_ref::<Foo>(),
        app::register_ref::<Foo>(),
        app::register_ref_with(Bar {
            name: "x".to_string(),
        }),
    ] {
        match status {
            Ok(status) => println!("   {:?}: {}", status, status),
            Err(e) => println!("   Error: {}", e),
        }
    }

    // -------------------------------------------------------------------------
    // 4. Assign
    // -------------------------------------------------------------------------
    println!("\n4. Retrieving values with assign_ref() -> Arc<T>...");

    if let Ok(foo) = app::assign_ref::<Foo>() {
        println!("   Foo hits: {}", foo.hits);
    }
    if let Ok(bar) = app::assign_ref::<Bar>() {
        println!("   Bar name: {}", bar.name);
    }

    let first: Option<Arc<Bar>> = app::assign_ref().ok();
    let second: Option<Arc<Bar>> = app::assign_ref().ok();
    if let (Some(first), Some(second)) = (first, second) {
        println!("   Same instance: {}", Arc::ptr_eq(&first, &second));
    }

    // -------------------------------------------------------------------------
    // 5. Failures
    // -------------------------------------------------------------------------
    println!("\n5. Handling failures...");

    match app::assign_ref::<Baz>() {
        Ok(value) => println!("   Found Baz: {:?}", value),
        Err(e) => println!("   Error (expected): {}", e),
    }

    let wrong: ProviderEntry = Arc::new(Bar {
        name: "not a Baz".to_string(),
    });
    match app::register_ref_any::<Baz>(wrong) {
        Ok(status) => println!("   Unexpected: {}", status),
        Err(e) => println!("   Error (expected): {} [{:?}]", e, e.kind()),
    }

    println!("\n=== Example Complete ===");
}

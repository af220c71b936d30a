//! Composition root example for singleton-container.
//!
//! Demonstrates:
//! - Building one explicit `Container` at startup
//! - Passing it to components that resolve their dependencies from it
//! - Concurrent startup paths racing to register the same type
//! - Watching operations through a trace callback
//!
//! Run with: `cargo run --example composition_root`

use singleton_container::{Container, ContainerApi, ContainerError, ContainerEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Configuration read once at startup.
#[derive(Debug)]
struct Settings {
    endpoint: String,
    workers: usize,
}

/// Shared request counter.
#[derive(Debug, Default)]
struct Metrics {
    requests: AtomicU64,
}

struct Handler {
    container: Arc<Container>,
}

impl Handler {
    fn handle(&self, id: usize) -> Result<String, ContainerError> {
        let settings = self.container.assign_ref::<Settings>()?;
        let metrics = self.container.assign_ref::<Metrics>()?;

        let total = metrics.requests.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("worker {} -> {} (total {})", id, settings.endpoint, total))
    }
}

fn main() -> Result<(), ContainerError> {
    tracing_subscriber::fmt().init();

    println!("=== singleton-container: Composition Root ===\n");

    let container = Container::new().shared();

    container.set_trace_callback(|event| {
        if let ContainerEvent::Register { key, status } = event {
            println!("   [trace] {} -> {:?}", key, status);
        }
    });

    // -------------------------------------------------------------------------
    // 1. Register configuration
    // -------------------------------------------------------------------------
    println!("1. Registering settings...");

    container.register_ref_with(Settings {
        endpoint: "https://api.example.com".to_string(),
        workers: 4,
    })?;

    // -------------------------------------------------------------------------
    // 2. Several startup paths register Metrics; exactly one creates it
    // -------------------------------------------------------------------------
    println!("\n2. Racing registrations of Metrics...");

    let workers = container.assign_ref::<Settings>()?.workers;
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || container.register_ref::<Metrics>())
        })
        .collect();

    for handle in handles {
        match handle.join() {
            Ok(status) => println!("   status: {}", status?),
            Err(_) => println!("   registration thread panicked"),
        }
    }

    // -------------------------------------------------------------------------
    // 3. Components resolve their dependencies
    // -------------------------------------------------------------------------
    println!("\n3. Handling requests...");

    container.clear_trace_callback();

    let handler = Handler {
        container: container.clone(),
    };
    for id in 0..workers {
        println!("   {}", handler.handle(id)?);
    }

    println!("\n   Registered: {:?}", container.keys());

    println!("\n=== Example Complete ===");
    Ok(())
}

//! An explicit, instance-owned container.
//!
//! `Container` is meant to be built once at startup and handed to the parts of
//! the application that register or resolve singletons. Each instance is fully
//! isolated, which also makes it the natural choice in tests.
//!
//! # Examples
//!
//! ```
//! use singleton_container::{Container, ContainerApi, RegisterStatus};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Metrics {
//!     requests: u64,
//! }
//!
//! let container = Container::new();
//! assert_eq!(container.register_ref::<Metrics>(), Ok(RegisterStatus::Create));
//! assert_eq!(container.register_ref::<Metrics>(), Ok(RegisterStatus::Exists));
//!
//! let metrics: Arc<Metrics> = container.assign_ref().unwrap();
//! assert_eq!(metrics.requests, 0);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{ContainerApi, Providers, TraceSlot, TypeKey};

/// A type-keyed singleton container owned by its creator.
#[derive(Default)]
pub struct Container {
    providers: Providers,
    trace: TraceSlot,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered singletons.
    pub fn len(&self) -> usize {
        self.providers
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of all registered singletons, in no particular order.
    pub fn keys(&self) -> Vec<TypeKey> {
        self.providers
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .keys()
            .copied()
            .collect()
    }

    /// Wrap the container in an `Arc` for sharing between components and threads.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl ContainerApi for Container {
    fn providers(&self) -> Option<&Providers> {
        Some(&self.providers)
    }

    fn trace(&self) -> &TraceSlot {
        &self.trace
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("keys", &self.keys())
            .finish()
    }
}

//! # Singleton Container
//!
//! A type-keyed singleton container: register one instance per type, then
//! assign (retrieve) it by type anywhere in the application.
//!
//! The container is meant to be the composition root of an application and
//! replaces manual wiring of shared singletons. Registration is idempotent and
//! append-only: the first registration of a type wins, later ones report
//! [`RegisterStatus::Exists`], and nothing is ever removed.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_container::{Container, ContainerApi, RegisterStatus};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Foo;
//!
//! struct Bar {
//!     name: String,
//! }
//!
//! struct Baz;
//!
//! let container = Container::new();
//!
//! assert_eq!(container.register_ref::<Foo>(), Ok(RegisterStatus::Create));
//! assert_eq!(container.register_ref::<Foo>(), Ok(RegisterStatus::Exists));
//! assert_eq!(
//!     container.register_ref_with(Bar { name: "x".into() }),
//!     Ok(RegisterStatus::CreateInit)
//! );
//!
//! let bar: Arc<Bar> = container.assign_ref().unwrap();
//! assert_eq!(bar.name, "x");
//!
//! let missing = container.assign_ref::<Baz>().err().unwrap();
//! assert!(missing.to_string().ends_with("Baz> not found"));
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: create-if-absent is atomic; exactly one concurrent registration wins
//! - **Type-safe**: entries are keyed by `TypeId` and downcast on retrieval
//! - **Shared**: every caller receives the same `Arc<T>`
//! - **Traceable**: optional callback and `tracing` events for every operation
//!
//! ## Main Items
//!
//! - [`Container`] - An explicit container object
//! - [`define_container!`] - Declare a process-wide container module with an `init()`
//! - [`ContainerApi`] - The operations shared by both
//! - [`RegisterStatus`] / [`ContainerError`] - Outcomes of the operations
//!
//! ## Cargo Features
//!
//! - `tracing` (default) - emit every [`ContainerEvent`] as a `tracing` trace event
//!   with target `singleton_container`

mod container;
mod container_error;
mod container_event;
mod container_trait;
mod macros;
mod register_status;
mod type_key;

pub use container::Container;
pub use container_error::{ContainerError, ErrorKind};
pub use container_event::ContainerEvent;
pub use container_trait::{ContainerApi, ProviderEntry, Providers, TraceCallback, TraceSlot};
pub use register_status::RegisterStatus;
pub use type_key::TypeKey;

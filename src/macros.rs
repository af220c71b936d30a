//! Macros for declaring process-wide containers.

/// Declares a process-wide singleton container as a module.
///
/// The macro generates a module containing:
/// - Storage static (hidden), created by `init()`
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `ContainerApi`
/// - Free functions delegating to it
///
/// Every operation fails with `ContainerError::Uninitialized` until `init()` has
/// been called. `init()` is thread-safe and idempotent; it returns `true` only for
/// the call that actually created the storage.
///
/// # Examples
///
/// ```rust
/// use singleton_container::{define_container, RegisterStatus};
/// use std::sync::Arc;
///
/// define_container!(app);
///
/// #[derive(Default)]
/// struct Settings {
///     verbose: bool,
/// }
///
/// assert!(app::register_ref::<Settings>().is_err());
///
/// app::init();
/// assert_eq!(app::register_ref::<Settings>(), Ok(RegisterStatus::Create));
/// assert_eq!(app::register_ref::<Settings>(), Ok(RegisterStatus::Exists));
///
/// let settings: Arc<Settings> = app::assign_ref().unwrap();
/// assert!(!settings.verbose);
/// ```
///
/// # Multiple Containers
///
/// Each invocation creates an isolated container:
///
/// ```rust
/// use singleton_container::define_container;
///
/// define_container!(database);
/// define_container!(cache);
///
/// database::init();
/// cache::init();
///
/// database::register_ref_with("db_connection".to_string()).unwrap();
///
/// assert!(database::contains::<String>().unwrap());
/// assert!(!cache::contains::<String>().unwrap());
/// ```
#[macro_export]
macro_rules! define_container {
    ($name:ident) => {
        // Callers rarely use every generated function.
        #[allow(dead_code)]
        pub mod $name {
            // Storage, created by `init()` (module-private)
            static PROVIDERS: ::std::sync::OnceLock<$crate::Providers> =
                ::std::sync::OnceLock::new();

            // Trace callback storage (module-private)
            static TRACE: $crate::TraceSlot = ::std::sync::Mutex::new(None);

            /// Zero-sized type that implements the container API.
            struct Api;

            impl $crate::ContainerApi for Api {
                fn providers(&self) -> Option<&$crate::Providers> {
                    PROVIDERS.get()
                }

                fn trace(&self) -> &$crate::TraceSlot {
                    &TRACE
                }
            }

            const API: Api = Api;

            /// Create the container storage. Later calls do nothing and return `false`.
            pub fn init() -> bool {
                use $crate::ContainerApi;

                let mut fresh = false;
                PROVIDERS.get_or_init(|| {
                    fresh = true;
                    $crate::Providers::default()
                });

                if fresh {
                    API.emit_event(&$crate::ContainerEvent::Init {});
                }

                fresh
            }

            /// Whether `init()` has completed.
            pub fn is_initialized() -> bool {
                PROVIDERS.get().is_some()
            }

            /// Register a default-constructed `T` unless one is already present.
            pub fn register_ref<T: Default + Send + Sync + 'static>(
            ) -> Result<$crate::RegisterStatus, $crate::ContainerError> {
                use $crate::ContainerApi;
                API.register_ref::<T>()
            }

            /// Register `value` as the singleton of `T` unless one is already present.
            pub fn register_ref_with<T: Send + Sync + 'static>(
                value: T,
            ) -> Result<$crate::RegisterStatus, $crate::ContainerError> {
                use $crate::ContainerApi;
                API.register_ref_with(value)
            }

            /// Register an Arc-wrapped value as the singleton of `T`.
            pub fn register_ref_arc<T: Send + Sync + 'static>(
                value: ::std::sync::Arc<T>,
            ) -> Result<$crate::RegisterStatus, $crate::ContainerError> {
                use $crate::ContainerApi;
                API.register_ref_arc(value)
            }

            /// Register a type-erased value as the singleton of `T`.
            pub fn register_ref_any<T: Send + Sync + 'static>(
                value: $crate::ProviderEntry,
            ) -> Result<$crate::RegisterStatus, $crate::ContainerError> {
                use $crate::ContainerApi;
                API.register_ref_any::<T>(value)
            }

            /// Retrieve the singleton of `T`.
            pub fn assign_ref<T: Send + Sync + 'static>(
            ) -> Result<::std::sync::Arc<T>, $crate::ContainerError> {
                use $crate::ContainerApi;
                API.assign_ref::<T>()
            }

            /// Check if a type is registered.
            pub fn contains<T: Send + Sync + 'static>() -> Result<bool, $crate::ContainerError> {
                use $crate::ContainerApi;
                API.contains::<T>()
            }

            /// Set a tracing callback for container operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::ContainerEvent) + Send + Sync + 'static,
            ) {
                use $crate::ContainerApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::ContainerApi;
                API.clear_trace_callback()
            }
        }
    };
}

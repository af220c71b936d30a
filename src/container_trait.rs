//! Core trait defining container behavior.
//!
//! This module provides the `ContainerApi` trait with default implementations for
//! type-keyed registration, assignment, and tracing of singleton instances.
//!
//! The container is type-based: each type (`TypeKey`) can have exactly one instance
//! stored. The first successful registration wins; later registrations of the same
//! type report `Exists` and leave the stored instance untouched.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{ContainerError, ContainerEvent, RegisterStatus, TypeKey};

/// A stored singleton. Its dynamic type always matches the key it is filed under.
pub type ProviderEntry = Arc<dyn Any + Send + Sync>;

/// Storage backing a container.
pub type Providers = RwLock<HashMap<TypeKey, ProviderEntry>>;

/// User-supplied tracing callback, invoked with every `ContainerEvent`.
pub type TraceCallback = dyn Fn(&ContainerEvent) + Send + Sync + 'static;

/// Storage for the optional trace callback.
pub type TraceSlot = Mutex<Option<Arc<TraceCallback>>>;

/// Core trait defining container behavior.
///
/// Provides default implementations for all container operations, requiring only
/// two accessor methods (`providers` and `trace`) to be implemented by the implementor.
pub trait ContainerApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback slot.
    fn trace(&self) -> &TraceSlot;

    /// Set a tracing callback for container operations.
    ///
    /// The callback is invoked for every operation (init, register, assign, contains).
    ///
    /// # Restrictions
    ///
    /// The callback must NOT call operations of the same container: each of them
    /// emits another event, so the callback would recurse without bound.
    fn set_trace_callback(&self, callback: impl Fn(&ContainerEvent) + Send + Sync + 'static) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Registered values are not affected.
    fn clear_trace_callback(&self) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Emit an event to the `tracing` dispatcher and the current callback.
    ///
    /// The callback runs after the trace lock is released, so it may replace or
    /// clear itself.
    fn emit_event(&self, event: &ContainerEvent) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "singleton_container", "{}", event);

        let callback = self
            .trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Container
    // -------------------------------------------------------------------------------------------------

    /// Access the storage, or `None` if the container has not been initialized.
    fn providers(&self) -> Option<&Providers>;

    /// Register a default-constructed `T` unless one is already present.
    ///
    /// Returns `Create` when a new instance was stored and `Exists` otherwise.
    ///
    /// # Errors
    ///
    /// - `Uninitialized` if the container has not been initialized
    fn register_ref<T: Default + Send + Sync + 'static>(
        &self,
    ) -> Result<RegisterStatus, ContainerError> {
        store_if_absent::<Self, T, _>(self, RegisterStatus::Create, || {
            Ok(Arc::new(T::default()) as ProviderEntry)
        })
    }

    /// Register `value` as the singleton of `T` unless one is already present.
    ///
    /// Returns `CreateInit` when `value` was stored. If `T` is already present,
    /// `value` is dropped and `Exists` is returned.
    fn register_ref_with<T: Send + Sync + 'static>(
        &self,
        value: T,
    ) -> Result<RegisterStatus, ContainerError> {
        store_if_absent::<Self, T, _>(self, RegisterStatus::CreateInit, move || {
            Ok(Arc::new(value) as ProviderEntry)
        })
    }

    /// Register an Arc-wrapped value.
    ///
    /// The very same allocation is stored, so `assign_ref` hands back an `Arc`
    /// that is `Arc::ptr_eq` to `value`.
    fn register_ref_arc<T: Send + Sync + 'static>(
        &self,
        value: Arc<T>,
    ) -> Result<RegisterStatus, ContainerError> {
        store_if_absent::<Self, T, _>(self, RegisterStatus::CreateInit, move || {
            Ok(value as ProviderEntry)
        })
    }

    /// Register a type-erased value as the singleton of `T`.
    ///
    /// The presence check happens first: if `T` is already registered the call
    /// returns `Exists` whatever `value` holds.
    ///
    /// # Errors
    ///
    /// - `Uninitialized` if the container has not been initialized
    /// - `InitParameter` if `value` is not a `T`; nothing is stored
    fn register_ref_any<T: Send + Sync + 'static>(
        &self,
        value: ProviderEntry,
    ) -> Result<RegisterStatus, ContainerError> {
        store_if_absent::<Self, T, _>(self, RegisterStatus::CreateInit, move || {
            if value.is::<T>() {
                Ok(value)
            } else {
                Err(ContainerError::InitParameter(TypeKey::of::<T>()))
            }
        })
    }

    /// Retrieve the singleton of `T`.
    ///
    /// Every caller receives the same shared instance.
    ///
    /// # Errors
    ///
    /// - `Uninitialized` if the container has not been initialized
    /// - `NotFound` if `T` was never registered
    /// - `NotRegistered` if the stored entry is not a `T` (does not happen while
    ///   entries are only written through this trait)
    fn assign_ref<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        let key = TypeKey::of::<T>();

        let result = match self.providers() {
            Some(providers) => match read(providers).get(&key).cloned() {
                Some(entry) => entry
                    .downcast::<T>()
                    .map_err(|_| ContainerError::NotRegistered(key)),
                None => Err(ContainerError::NotFound(key)),
            },
            None => Err(ContainerError::Uninitialized),
        };

        self.emit_event(&ContainerEvent::Assign {
            key,
            found: result.is_ok(),
        });

        result
    }

    /// Check if a type is registered.
    ///
    /// # Errors
    ///
    /// - `Uninitialized` if the container has not been initialized
    fn contains<T: Send + Sync + 'static>(&self) -> Result<bool, ContainerError> {
        let key = TypeKey::of::<T>();

        let result = match self.providers() {
            Some(providers) => Ok(read(providers).contains_key(&key)),
            None => Err(ContainerError::Uninitialized),
        };

        self.emit_event(&ContainerEvent::Contains {
            key,
            found: matches!(result, Ok(true)),
        });

        result
    }
}

/// Shared create-if-absent path of the `register_ref*` operations.
///
/// `make` runs outside the storage lock since it may execute user code
/// (`T::default()`). The final insert is an `entry()` check-and-set under the
/// write lock: if another caller stored `T` in between, `Exists` is reported and
/// the built value is dropped once the lock is released, as its `Drop` is user
/// code too.
fn store_if_absent<C, T, F>(
    container: &C,
    created: RegisterStatus,
    make: F,
) -> Result<RegisterStatus, ContainerError>
where
    C: ContainerApi + ?Sized,
    T: Send + Sync + 'static,
    F: FnOnce() -> Result<ProviderEntry, ContainerError>,
{
    let key = TypeKey::of::<T>();

    let result = container
        .providers()
        .ok_or(ContainerError::Uninitialized)
        .and_then(|providers| {
            if read(providers).contains_key(&key) {
                return Ok(RegisterStatus::Exists);
            }

            let entry = make()?;

            let loser = {
                let mut map = write(providers);
                match map.entry(key) {
                    Entry::Occupied(_) => Some(entry),
                    Entry::Vacant(slot) => {
                        slot.insert(entry);
                        None
                    }
                }
            };

            match loser {
                Some(entry) => {
                    drop(entry);
                    Ok(RegisterStatus::Exists)
                }
                None => Ok(created),
            }
        });

    container.emit_event(&ContainerEvent::Register {
        key,
        status: result.as_ref().map_or(RegisterStatus::Unknown, |s| *s),
    });

    result
}

// Poisoning only happens if a thread panicked while holding the lock. Entries are
// inserted whole, so the map is consistent either way.
fn read(providers: &Providers) -> RwLockReadGuard<'_, HashMap<TypeKey, ProviderEntry>> {
    providers.read().unwrap_or_else(|p| p.into_inner())
}

fn write(providers: &Providers) -> RwLockWriteGuard<'_, HashMap<TypeKey, ProviderEntry>> {
    providers.write().unwrap_or_else(|p| p.into_inner())
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{ContainerApi, ProviderEntry, Providers, TraceSlot};
    use crate::{ContainerError, ContainerEvent, RegisterStatus, TypeKey};

    use std::sync::{Arc, Mutex};

    /// Bare implementor with direct access to its storage.
    #[derive(Default)]
    struct Api {
        providers: Option<Providers>,
        trace: TraceSlot,
    }

    impl Api {
        fn initialized() -> Self {
            Self {
                providers: Some(Providers::default()),
                trace: TraceSlot::default(),
            }
        }
    }

    impl ContainerApi for Api {
        fn providers(&self) -> Option<&Providers> {
            self.providers.as_ref()
        }

        fn trace(&self) -> &TraceSlot {
            &self.trace
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Foo {
        count: u32,
    }

    #[derive(Debug, PartialEq)]
    struct Bar {
        name: String,
    }

    #[derive(Debug)]
    struct Baz;

    fn record_events(api: &Api) -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        api.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(format!("{}", e));
        });
        events
    }

    #[test]
    fn test_register_then_exists() {
        let api = Api::initialized();

        assert_eq!(api.register_ref::<Foo>(), Ok(RegisterStatus::Create));
        assert_eq!(api.register_ref::<Foo>(), Ok(RegisterStatus::Exists));

        let foo = api.assign_ref::<Foo>().unwrap();
        assert_eq!(*foo, Foo::default());
    }

    #[test]
    fn test_register_with_value() -> Result<(), ContainerError> {
        let api = Api::initialized();

        let status = api.register_ref_with(Bar {
            name: "x".to_string(),
        })?;
        assert_eq!(status, RegisterStatus::CreateInit);

        let bar = api.assign_ref::<Bar>()?;
        assert_eq!(bar.name, "x");

        Ok(())
    }

    #[test]
    fn test_register_with_keeps_first_value() {
        let api = Api::initialized();

        api.register_ref_with(10i32).unwrap();
        assert_eq!(api.register_ref_with(20i32), Ok(RegisterStatus::Exists));

        assert_eq!(*api.assign_ref::<i32>().unwrap(), 10);
    }

    #[test]
    fn test_register_arc_shares_allocation() {
        let api = Api::initialized();
        let value = Arc::new(Bar {
            name: "shared".to_string(),
        });

        assert_eq!(
            api.register_ref_arc(value.clone()),
            Ok(RegisterStatus::CreateInit)
        );

        let retrieved = api.assign_ref::<Bar>().unwrap();
        assert!(Arc::ptr_eq(&value, &retrieved));
        assert_eq!(Arc::strong_count(&value), 3); // value + container + retrieved
    }

    #[test]
    fn test_register_any_matching_type() {
        let api = Api::initialized();
        let value: ProviderEntry = Arc::new(Foo { count: 7 });

        assert_eq!(
            api.register_ref_any::<Foo>(value),
            Ok(RegisterStatus::CreateInit)
        );
        assert_eq!(api.assign_ref::<Foo>().unwrap().count, 7);
    }

    #[test]
    fn test_register_any_mismatched_type() {
        let api = Api::initialized();
        let value: ProviderEntry = Arc::new(Foo::default());

        let err = api.register_ref_any::<Bar>(value).unwrap_err();
        assert_eq!(err, ContainerError::InitParameter(TypeKey::of::<Bar>()));
        assert_eq!(err.status(), RegisterStatus::Unknown);
        assert_eq!(err.to_string(), "initialization parameter not specified");

        // nothing was stored
        assert_eq!(
            api.assign_ref::<Bar>().unwrap_err(),
            ContainerError::NotFound(TypeKey::of::<Bar>())
        );
        assert!(!api.contains::<Foo>().unwrap());
    }

    #[test]
    fn test_register_any_checks_presence_first() {
        let api = Api::initialized();
        api.register_ref::<Foo>().unwrap();

        let wrong: ProviderEntry = Arc::new(Baz);
        assert_eq!(api.register_ref_any::<Foo>(wrong), Ok(RegisterStatus::Exists));
    }

    #[test]
    fn test_assign_not_found() {
        let api = Api::initialized();

        let err = api.assign_ref::<Baz>().unwrap_err();
        assert_eq!(err, ContainerError::NotFound(TypeKey::of::<Baz>()));
        assert_eq!(
            err.to_string(),
            format!("container <{}> not found", std::any::type_name::<Baz>())
        );
    }

    #[test]
    fn test_assign_stored_type_mismatch() {
        let api = Api::initialized();

        // Bypass the trait to file an entry under the wrong key.
        api.providers()
            .unwrap()
            .write()
            .unwrap()
            .insert(TypeKey::of::<Foo>(), Arc::new(Baz));

        let err = api.assign_ref::<Foo>().unwrap_err();
        assert_eq!(err, ContainerError::NotRegistered(TypeKey::of::<Foo>()));
    }

    #[test]
    fn test_uninitialized() {
        let api = Api::default();

        let err = api.register_ref::<Foo>().unwrap_err();
        assert_eq!(err, ContainerError::Uninitialized);
        assert_eq!(err.status(), RegisterStatus::Unknown);

        assert_eq!(
            api.register_ref_with(1u8),
            Err(ContainerError::Uninitialized)
        );
        assert_eq!(
            api.assign_ref::<Foo>().unwrap_err(),
            ContainerError::Uninitialized
        );
        assert_eq!(api.contains::<Foo>(), Err(ContainerError::Uninitialized));
    }

    #[test]
    fn test_contains() {
        let api = Api::initialized();
        assert!(!api.contains::<u32>().unwrap());
        api.register_ref_with(1u32).unwrap();
        assert!(api.contains::<u32>().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let api = Arc::new(Api::initialized());
        api.register_ref_with(5u8).unwrap();

        let poisoner = api.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.providers().unwrap().write().unwrap();
            panic!("poison the storage lock");
        })
        .join();

        assert!(api.providers().unwrap().is_poisoned());
        assert_eq!(*api.assign_ref::<u8>().unwrap(), 5);
        assert_eq!(api.register_ref::<Foo>(), Ok(RegisterStatus::Create));
    }

    #[test]
    fn test_trace_events() {
        let api = Api::initialized();
        let events = record_events(&api);

        api.register_ref::<u16>().unwrap();
        api.register_ref::<u16>().unwrap();
        let _ = api.assign_ref::<u16>();
        let _ = api.assign_ref::<i16>();
        let _ = api.contains::<u16>();
        let _ = api.register_ref_any::<i16>(Arc::new(1u16));

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "register { type_key: u16, status: create }",
                "register { type_key: u16, status: exists }",
                "assign { type_key: u16, found: true }",
                "assign { type_key: i16, found: false }",
                "contains { type_key: u16, found: true }",
                "register { type_key: i16, status: unknown }",
            ]
        );
    }

    #[test]
    fn test_trace_event_on_uninitialized() {
        let api = Api::default();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        api.set_trace_callback(move |e| events_clone.lock().unwrap().push(e.clone()));

        let _ = api.register_ref::<Foo>();
        let _ = api.assign_ref::<Foo>();
        let _ = api.contains::<Foo>();

        let key = TypeKey::of::<Foo>();
        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                ContainerEvent::Register {
                    key,
                    status: RegisterStatus::Unknown,
                },
                ContainerEvent::Assign { key, found: false },
                ContainerEvent::Contains { key, found: false },
            ]
        );
    }

    #[test]
    fn test_losing_value_is_dropped_after_lock_release() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::{mpsc, OnceLock};
        use std::time::Duration;

        static API: OnceLock<Api> = OnceLock::new();
        static DROP_REACHED_STORAGE: AtomicBool = AtomicBool::new(false);

        fn api() -> &'static Api {
            API.get_or_init(Api::initialized)
        }

        struct Racer {
            touches_storage_on_drop: bool,
        }

        impl Default for Racer {
            fn default() -> Self {
                // Another registration wins while this value is being built.
                api()
                    .register_ref_with(Racer {
                        touches_storage_on_drop: false,
                    })
                    .unwrap();
                Racer {
                    touches_storage_on_drop: true,
                }
            }
        }

        impl Drop for Racer {
            fn drop(&mut self) {
                if self.touches_storage_on_drop && api().contains::<u8>() == Ok(false) {
                    DROP_REACHED_STORAGE.store(true, Ordering::SeqCst);
                }
            }
        }

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(api().register_ref::<Racer>());
        });

        let status = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("register_ref blocked while dropping the losing value");
        assert_eq!(status, Ok(RegisterStatus::Exists));
        assert!(DROP_REACHED_STORAGE.load(Ordering::SeqCst));
        assert!(!api().assign_ref::<Racer>().unwrap().touches_storage_on_drop);
    }

    #[test]
    fn test_clear_trace_callback_stops_events() {
        let api = Api::initialized();
        let events = record_events(&api);

        api.register_ref::<u64>().unwrap();
        api.clear_trace_callback();
        api.register_ref::<i64>().unwrap();
        let _ = api.assign_ref::<i64>();

        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_callback_may_clear_itself() {
        let api = Arc::new(Api::initialized());
        let events = Arc::new(Mutex::new(0usize));
        let events_clone = events.clone();
        let weak = Arc::downgrade(&api);

        api.set_trace_callback(move |_| {
            *events_clone.lock().unwrap() += 1;
            if let Some(api) = weak.upgrade() {
                api.clear_trace_callback();
            }
        });

        api.register_ref::<u8>().unwrap();
        api.register_ref::<u8>().unwrap();

        assert_eq!(*events.lock().unwrap(), 1);
    }
}

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonical identifier of a type, used to key the container.
///
/// Identity is the `TypeId`, so two distinct types never collide even when
/// their names print the same. The type name is kept for messages only.
///
/// # Examples
///
/// ```rust
/// use singleton_container::TypeKey;
///
/// assert_eq!(TypeKey::of::<u8>(), TypeKey::of::<u8>());
/// assert_ne!(TypeKey::of::<u8>(), TypeKey::of::<u16>());
/// assert_eq!(TypeKey::of::<u8>().to_string(), "u8");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Resolve the key of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The qualified type name, e.g. `alloc::string::String`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

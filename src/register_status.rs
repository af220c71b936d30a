use std::fmt;

/// Outcome of a registration attempt.
///
/// Each call is classified against the container contents at that moment.
/// For a given type the first successful call yields [`Create`](Self::Create)
/// or [`CreateInit`](Self::CreateInit), every later call [`Exists`](Self::Exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegisterStatus {
    /// Registration failed; see the accompanying error.
    #[default]
    Unknown,
    /// A default-constructed instance was stored.
    Create,
    /// The caller-supplied instance was stored.
    CreateInit,
    /// An instance was already present; nothing changed.
    Exists,
}

impl RegisterStatus {
    /// `true` when this call stored a new instance.
    pub fn is_created(&self) -> bool {
        matches!(self, RegisterStatus::Create | RegisterStatus::CreateInit)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            RegisterStatus::Unknown => "unknown",
            RegisterStatus::Create => "create",
            RegisterStatus::CreateInit => "create_init",
            RegisterStatus::Exists => "exists",
        }
    }
}

impl fmt::Display for RegisterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterStatus::Exists => write!(f, "the container already exists"),
            RegisterStatus::Create => {
                write!(f, "the container is registered without being initialized")
            }
            RegisterStatus::CreateInit => {
                write!(f, "the container is registered from its initialization")
            }
            RegisterStatus::Unknown => write!(f, "the container is not registered"),
        }
    }
}

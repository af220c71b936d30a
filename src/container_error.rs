use thiserror::Error;

use crate::{RegisterStatus, TypeKey};

/// Errors returned by container operations.
///
/// The messages are stable; callers may match on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// A process-wide container was used before its `init()`.
    #[error("the module's init function was not called")]
    Uninitialized,

    /// The value supplied to `register_ref_any` is not of the requested type.
    #[error("initialization parameter not specified")]
    InitParameter(TypeKey),

    /// Nothing is registered for the requested type.
    #[error("container <{0}> not found")]
    NotFound(TypeKey),

    /// The stored entry does not downcast to the requested type.
    #[error("type provider <{0}> is not registered")]
    NotRegistered(TypeKey),
}

/// Coarse classification of a [`ContainerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Uninitialized,
    TypeMismatch,
    NotFound,
}

impl ContainerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContainerError::Uninitialized => ErrorKind::Uninitialized,
            ContainerError::InitParameter(_) | ContainerError::NotRegistered(_) => {
                ErrorKind::TypeMismatch
            }
            ContainerError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Registration status reported alongside this error.
    ///
    /// A failed registration never stores anything, so this is always
    /// [`RegisterStatus::Unknown`].
    pub fn status(&self) -> RegisterStatus {
        RegisterStatus::Unknown
    }
}

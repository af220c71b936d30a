use crate::{RegisterStatus, TypeKey};

/// Events emitted by a container during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`
/// and, with the `tracing` feature, to the `tracing` dispatcher.
///
/// # Examples
///
/// ```rust
/// use singleton_container::{ContainerEvent, RegisterStatus, TypeKey};
///
/// let event = ContainerEvent::Register {
///     key: TypeKey::of::<i32>(),
///     status: RegisterStatus::Create,
/// };
/// assert_eq!(event.to_string(), "register { type_key: i32, status: create }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerEvent {
    /// A process-wide container was initialized.
    Init {},

    /// A registration was attempted.
    Register {
        key: TypeKey,
        /// `Unknown` when the attempt failed
        status: RegisterStatus,
    },

    /// A value was requested.
    Assign { key: TypeKey, found: bool },

    /// A type existence check was performed.
    Contains { key: TypeKey, found: bool },
}

impl std::fmt::Display for ContainerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerEvent::Init {} => write!(f, "Initializing the Container"),
            ContainerEvent::Register { key, status } => {
                write!(
                    f,
                    "register {{ type_key: {}, status: {} }}",
                    key,
                    status.as_str()
                )
            }
            ContainerEvent::Assign { key, found } => {
                write!(f, "assign {{ type_key: {}, found: {} }}", key, found)
            }
            ContainerEvent::Contains { key, found } => {
                write!(f, "contains {{ type_key: {}, found: {} }}", key, found)
            }
        }
    }
}

use thiserror::Error;

/// Domain-level errors
///
/// Transports map these to their own status codes; `kind()` is the stable
/// name they use for it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Payload failed structural validation. Carries every violated rule.
    #[error("Invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or state-machine violation
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Storage returned data that breaks a domain invariant
    #[error("Inconsistent storage: {0}")]
    Inconsistent(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(vec![message.into()])
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::NotFound(_) => "NotFound",
            Self::Conflict(_) => "Conflict",
            Self::InvalidState(_) => "InvalidState",
            Self::Inconsistent(_) => "Inconsistent",
            Self::Storage(_) => "Storage",
        }
    }

    /// Individual messages, one per violated rule for `InvalidInput`
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::InvalidInput(errors) => errors.clone(),
            Self::NotFound(m)
            | Self::Conflict(m)
            | Self::InvalidState(m)
            | Self::Inconsistent(m)
            | Self::Storage(m) => vec![m.clone()],
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

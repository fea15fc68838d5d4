//! Error taxonomy for registry operations.
//!
//! Every variant is a programmer or configuration error: the failing
//! operation aborts immediately and leaves the registry unchanged. Lifecycle
//! notices (deprecation, removal) are not errors and never appear here.
use thiserror::Error;

/// Errors raised by `PolicyEngine` and its components.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy '{0}' is already registered")]
    DuplicateName(String),

    #[error("policy '{0}' is not registered")]
    NotRegistered(String),

    #[error("invalid default '{value}' for policy '{name}' (expected NEW or OLD)")]
    InvalidDefault { name: String, value: String },

    #[error("invalid value '{value}' for policy '{name}' (expected NEW or OLD)")]
    InvalidValue { name: String, value: String },

    #[error("policy registration is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid version range: maximum {maximum} is older than minimum {minimum}")]
    InvalidRange { minimum: String, maximum: String },

    #[error("invalid version '{0}': expected up to three dotted numeric components")]
    InvalidVersion(String),
}

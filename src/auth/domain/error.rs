//! Error types for authentication domain validation.

use thiserror::Error;

/// Errors returned while constructing authentication values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthDomainError {
    /// The email address is absent or blank.
    #[error("email is required")]
    MissingEmail,

    /// The password is absent or empty.
    #[error("password is required")]
    MissingPassword,

    /// The email address is malformed.
    #[error("invalid email format: {0}")]
    InvalidEmail(String),

    /// The password is shorter than the minimum length.
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// The session token is blank.
    #[error("session token must not be empty")]
    EmptySessionToken,
}

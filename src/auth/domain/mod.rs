//! Domain model for credentials and sessions.

mod credentials;
mod error;
mod session;

pub use credentials::{Credentials, EmailAddress, MIN_PASSWORD_LENGTH};
pub use error::AuthDomainError;
pub use session::{Identity, SessionToken};

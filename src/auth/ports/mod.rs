//! Port contracts for authentication.

pub mod identity;

#[cfg(test)]
pub use identity::MockIdentityProvider;
pub use identity::{IdentityProvider, IdentityProviderError, IdentityProviderResult};

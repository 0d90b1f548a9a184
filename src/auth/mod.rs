//! Authentication gateway for taskdesk.
//!
//! Credentials are verified by an external identity provider, which issues
//! an opaque session token. taskdesk keeps no session store: every request
//! re-validates its token with the provider. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

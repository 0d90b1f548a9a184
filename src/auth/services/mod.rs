//! Application services for login and session validation.

mod session;

pub use session::{AuthService, AuthServiceError, AuthServiceResult};

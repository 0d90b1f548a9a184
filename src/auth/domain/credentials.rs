//! Login credentials.

use super::AuthDomainError;
use std::fmt;

/// Shortest password the login form and endpoint accept.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Normalized email address: trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError::MissingEmail`] for blank input and
    /// [`AuthDomainError::InvalidEmail`] when the value is not of the form
    /// `local@domain.tld`.
    pub fn new(value: impl Into<String>) -> Result<Self, AuthDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(AuthDomainError::MissingEmail);
        }

        let is_valid = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| is_valid_local(local) && is_valid_domain(domain));
        if !is_valid {
            return Err(AuthDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_local(local: &str) -> bool {
    !local.is_empty() && !local.chars().any(|ch| ch.is_whitespace() || ch == '@')
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        })
}

/// Email and password pair submitted at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: String,
}

impl Credentials {
    /// Creates validated credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthDomainError`] when the email is invalid or the password
    /// is empty or shorter than [`MIN_PASSWORD_LENGTH`].
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, AuthDomainError> {
        let email_address = EmailAddress::new(email)?;
        let secret = password.into();
        if secret.is_empty() {
            return Err(AuthDomainError::MissingPassword);
        }
        if secret.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthDomainError::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }
        Ok(Self {
            email: email_address,
            password: secret,
        })
    }

    /// Returns the normalized email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the plain-text password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

use std::fmt;

use serde::Serialize;

use crate::api::AuthError;

/// Registration rejects passwords shorter than this many characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const MISSING_LOGIN_FIELDS: &str = "Email and password are required";
const MISSING_REGISTER_FIELDS: &str = "Name, email, and password are required";
const INVALID_EMAIL: &str = "Invalid email format";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

/// Login input. Lives for one outbound call and is never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    /// Check the fields before any network I/O happens.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(MISSING_LOGIN_FIELDS.to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(AuthError::Validation(INVALID_EMAIL.to_string()));
        }
        Ok(())
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

/// Registration input.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation(MISSING_REGISTER_FIELDS.to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(AuthError::Validation(INVALID_EMAIL.to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(PASSWORD_TOO_SHORT.to_string()));
        }
        Ok(())
    }

    /// The login credentials matching this registration.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Basic `local@domain.tld` shape check.
///
/// No whitespace is allowed. The address is split at the last `@`; the
/// local part must be non-empty and the domain must contain a `.` that is
/// neither its first nor its last character.
pub fn is_valid_email(s: &str) -> bool {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || domain.len() < 3 {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        // Valid addresses
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("odd@name@example.com")); // split at last @

        // Invalid addresses
        assert!(!is_valid_email("")); // empty
        assert!(!is_valid_email("user")); // no @
        assert!(!is_valid_email("@example.com")); // empty local part
        assert!(!is_valid_email("user@")); // empty domain
        assert!(!is_valid_email("user@example")); // no dot in domain
        assert!(!is_valid_email("user@.com")); // dot first
        assert!(!is_valid_email("user@example.")); // dot last
        assert!(!is_valid_email("us er@example.com")); // whitespace
        assert!(!is_valid_email("user@exa\tmple.com"));
    }

    #[test]
    fn test_credentials_missing_fields() {
        for (email, password) in [("", "secret1"), ("user@example.com", ""), ("  ", "")] {
            let err = Credentials::new(email, password).validate().unwrap_err();
            assert!(matches!(err, AuthError::Validation(ref m) if m == MISSING_LOGIN_FIELDS));
        }
    }

    #[test]
    fn test_credentials_bad_email() {
        let err = Credentials::new("not-an-email", "secret1").validate().unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref m) if m == INVALID_EMAIL));
    }

    #[test]
    fn test_credentials_trim_email() {
        let creds = Credentials::new("  user@example.com ", "pw");
        assert_eq!(creds.email, "user@example.com");
        // Login has no length rule
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_registration_rules() {
        assert!(Registration::new("Amina", "amina@example.com", "123456").validate().is_ok());

        let err = Registration::new("", "amina@example.com", "123456").validate().unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref m) if m == MISSING_REGISTER_FIELDS));

        let err = Registration::new("Amina", "amina.example.com", "123456").validate().unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref m) if m == INVALID_EMAIL));

        let err = Registration::new("Amina", "amina@example.com", "12345").validate().unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref m) if m == PASSWORD_TOO_SHORT));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("user@example.com", "hunter22");
        let reg = Registration::new("U", "user@example.com", "hunter22");
        assert!(!format!("{:?}", creds).contains("hunter22"));
        assert!(!format!("{:?}", reg).contains("hunter22"));
    }
}

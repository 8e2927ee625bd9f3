//! Contact form message and local validation.
//!
//! Validation runs entirely on-device before any network call: every
//! field is required and the email must look like an address.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// A contact form submission
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// Check required fields and email shape; `Error::Validation` on failure
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(Error::Validation("Please fill in all fields".into()));
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(Error::Validation(
                "Please enter a valid email address".into(),
            ));
        }
        Ok(())
    }
}

/// Shorthand for validating an address outside a full message
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Dana".into(),
            email: "dana@example.com".into(),
            message: "Love the app".into(),
        }
    }

    #[test]
    fn test_valid_message_passes() {
        assert!(message().validate().is_ok());
    }

    #[test]
    fn test_empty_fields_rejected() {
        for field in ["name", "email", "message"] {
            let mut msg = message();
            match field {
                "name" => msg.name.clear(),
                "email" => msg.email.clear(),
                _ => msg.message.clear(),
            }
            assert!(
                matches!(msg.validate(), Err(Error::Validation(_))),
                "empty {} accepted",
                field
            );
        }
    }

    #[test]
    fn test_malformed_emails_rejected() {
        for email in ["dana", "dana@", "@example.com", "dana@example", "a b@c.d"] {
            let mut msg = message();
            msg.email = email.into();
            assert!(
                matches!(msg.validate(), Err(Error::Validation(_))),
                "{} accepted",
                email
            );
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("not-an-email"));
    }
}

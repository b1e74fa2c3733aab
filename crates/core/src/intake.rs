//! Validation for submitted quote requests.

use crate::error::CoreError;

pub const MAX_CONTACT_NAME_LENGTH: usize = 120;

pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Validate the contact name and optional message of a quote request.
pub fn validate_quote_request(contact_name: &str, message: Option<&str>) -> Result<(), CoreError> {
    if contact_name.trim().is_empty() {
        return Err(CoreError::Validation("Contact name must not be empty".into()));
    }
    if contact_name.chars().count() > MAX_CONTACT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Contact name must be at most {MAX_CONTACT_NAME_LENGTH} characters"
        )));
    }
    if message.is_some_and(|m| m.chars().count() > MAX_MESSAGE_LENGTH) {
        return Err(CoreError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

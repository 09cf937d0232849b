//! Per-field form errors.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationErrors;

/// Key for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Validation messages keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Record a message that is not tied to a field.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    /// Messages for `field`, empty when the field is valid.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn non_field(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when no error was recorded.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(field.to_string(), message);
            }
        }
        form_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut errors = FormErrors::new();
        assert!(errors.is_empty());

        errors.add("text", "This field is required.");
        errors.add_non_field("Something went wrong.");

        assert!(errors.has("text"));
        assert!(!errors.has("group"));
        assert_eq!(errors.get("text"), ["This field is required."]);
        assert_eq!(errors.non_field(), ["Something went wrong."]);
        assert!(errors.into_result().is_err());
    }
}

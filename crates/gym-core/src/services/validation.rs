//! Form field checks shared by the services.

use crate::error::DomainError;

/// Collects field errors so a form reports every problem at once.
#[derive(Debug, Default)]
pub struct FieldCheck {
    errors: Vec<String>,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, label: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{} is required", label));
        }
        self
    }

    pub fn max_len(mut self, label: &str, value: &str, max: usize) -> Self {
        if value.chars().count() > max {
            self.errors
                .push(format!("{} can't be longer than {} characters", label, max));
        }
        self
    }

    /// Blank values are left to [`FieldCheck::required`].
    pub fn email(mut self, label: &str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() && !is_plausible_email(value) {
            self.errors
                .push(format!("Please enter a valid {}", label.to_lowercase()));
        }
        self
    }

    pub fn check(mut self, ok: bool, message: impl Into<String>) -> Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    pub fn finish(self) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidFields(self.errors))
        }
    }
}

/// `local@domain.tld` with no whitespace.
pub fn is_plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

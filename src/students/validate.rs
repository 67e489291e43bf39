use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::students::dto::SubmitRequest;
use crate::students::repo_types::{NewStudent, Year};

/// Field name → message, one entry per failing field.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    /// Records a problem with `field`. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, format!("{field} is required"));
    } else if value.chars().any(char::is_control) {
        // Postgres refuses NUL in text, so catch control characters here.
        errors.add(field, format!("{field} must not contain control characters"));
    }
    value
}

/// Checks every field of a submission and builds the normalized record.
///
/// Text fields are trimmed and the email is lowercased, so `Alice@X.com` and
/// `alice@x.com` count as the same registration.
pub fn validate_submission(req: SubmitRequest) -> Result<NewStudent, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required_text(&mut errors, "name", req.name);
    let institute = required_text(&mut errors, "institute", req.institute);
    let department = required_text(&mut errors, "department", req.department);

    let year_raw = required_text(&mut errors, "year", req.year);
    let year = match year_raw.parse::<Year>() {
        Ok(y) => Some(y),
        Err(_) => {
            if !year_raw.is_empty() {
                errors.add("year", "year must be one of 1, 2, 3, 4");
            }
            None
        }
    };

    let phone = required_text(&mut errors, "phone", req.phone);
    if !phone.is_empty() && !is_valid_phone(&phone) {
        errors.add("phone", "phone must be exactly 10 digits");
    }

    let email = required_text(&mut errors, "email", req.email).to_lowercase();
    if !email.is_empty() && !is_valid_email(&email) {
        errors.add("email", "email is not a valid address");
    }

    match year {
        Some(year) if errors.is_empty() => Ok(NewStudent {
            name,
            year,
            institute,
            department,
            phone,
            email,
        }),
        _ => Err(errors),
    }
}

//! Form-level input checks.
//!
//! The record service trusts its input; front ends run these rules before
//! submitting a create or update.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::{NewStudent, StudentPatch};

/// Shortest accepted display name, in characters.
const MIN_NAME_LENGTH: usize = 2;

/// Inclusive range of valid study years.
const MIN_YEAR: u8 = 1;
const MAX_YEAR: u8 = 5;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern is valid")
    })
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name", "Student name is required"));
    }
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::new(
            "name",
            format!("Name must be at least {} characters", MIN_NAME_LENGTH),
        ));
    }
    Ok(())
}

/// Email rule shared by student forms and sign-in.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email is required"));
    }
    if !email_pattern().is_match(email) {
        return Err(ValidationError::new("email", "Invalid email address"));
    }
    Ok(())
}

fn check_course(course: &str) -> Result<(), ValidationError> {
    if course.trim().is_empty() {
        return Err(ValidationError::new("course", "Course is required"));
    }
    Ok(())
}

fn check_year(year: u8) -> Result<(), ValidationError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ValidationError::new(
            "year",
            format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR),
        ));
    }
    Ok(())
}

impl NewStudent {
    /// Returns the first failing rule, checked in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        validate_email(&self.email)?;
        check_course(&self.course)?;
        check_year(self.year)
    }
}

impl StudentPatch {
    /// Only supplied fields are checked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            check_name(name)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        if let Some(ref course) = self.course {
            check_course(course)?;
        }
        if let Some(year) = self.year {
            check_year(year)?;
        }
        Ok(())
    }
}

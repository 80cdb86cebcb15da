//! Field-constraint helpers shared by the auth and flight services.
//!
//! Input types declare their rules with `validator`'s derive; this module
//! turns the resulting `ValidationErrors` into a flat, ordered list of
//! [`FieldViolation`]s so every problem is reported in one round trip.

use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// One violated rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), code: code.into(), message: message.into() }
    }
}

/// All violations found on an input, ordered by field then code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn new(mut violations: Vec<FieldViolation>) -> Self {
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        Self { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] { &self.violations }

    /// Distinct violated field names, in order.
    pub fn fields(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.violations.iter().map(|v| v.field.as_str()).collect();
        out.dedup();
        out
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(|v| format!("{}: {}", v.field, v.message)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errs: ValidationErrors) -> Self {
        let mut violations = Vec::new();
        for (field, errors) in errs.field_errors() {
            for e in errors.iter() {
                violations.push(FieldViolation::new(field.to_string(), e.code.to_string(), describe(e)));
            }
        }
        Self::new(violations)
    }
}

/// Run the derived rules and return every violation found (empty when valid).
pub fn collect<T: Validate>(input: &T) -> Vec<FieldViolation> {
    match input.validate() {
        Ok(()) => Vec::new(),
        Err(errs) => ValidationFailure::from(errs).violations,
    }
}

/// Turn a violation list into a result.
pub fn into_result(violations: Vec<FieldViolation>) -> Result<(), ValidationFailure> {
    if violations.is_empty() { Ok(()) } else { Err(ValidationFailure::new(violations)) }
}

/// Shorthand for inputs that have no rules beyond their derive.
pub fn check<T: Validate>(input: &T) -> Result<(), ValidationFailure> {
    into_result(collect(input))
}

fn describe(e: &ValidationError) -> String {
    if let Some(msg) = &e.message {
        return msg.to_string();
    }
    match e.code.as_ref() {
        "required" => "cannot be blank".to_string(),
        "length" => {
            let blank = e.params.get("value").and_then(|v| v.as_str()).map(str::is_empty).unwrap_or(false);
            if blank {
                return "cannot be blank".to_string();
            }
            match e.params.get("max") {
                Some(max) => format!("the length must be no more than {}", max),
                None => "invalid length".to_string(),
            }
        }
        other => format!("failed rule `{}`", other),
    }
}

//! Field rules for contact payloads.

use crate::error::AppError;
use crate::model::{ContactPatch, NewContact};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const ADDRESS_MAX_CHARS: usize = 255;

/// Dotted domain with no empty labels.
const EMAIL_PATTERN: &str = r"^[^@\s]+@([^@\s.]+\.)+[^@\s.]+$";
/// `+` and 9-15 digits, or exactly 10 digits.
const PHONE_PATTERN: &str = r"^(\+[0-9]{9,15}|[0-9]{10})$";

type CompiledPattern = OnceLock<Result<Regex, regex::Error>>;

fn compiled(cell: &'static CompiledPattern, field: &str, pattern: &str) -> Result<&'static Regex, AppError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| AppError::Internal(format!("invalid pattern for {}: {}", field, e)))
}

fn email_regex() -> Result<&'static Regex, AppError> {
    static RE: CompiledPattern = OnceLock::new();
    compiled(&RE, "email", EMAIL_PATTERN)
}

fn phone_regex() -> Result<&'static Regex, AppError> {
    static RE: CompiledPattern = OnceLock::new();
    compiled(&RE, "phone", PHONE_PATTERN)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldViolation {
            field,
            message: message.into(),
        }
    }
}

/// Every violation found in one payload, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|v| v.field)
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl From<Vec<FieldViolation>> for ValidationErrors {
    fn from(v: Vec<FieldViolation>) -> Self {
        ValidationErrors(v)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", v.field, v.message)?;
        }
        Ok(())
    }
}

pub struct ContactValidator;

impl ContactValidator {
    /// Validate a full payload and return it normalized (name trimmed).
    pub fn validate(payload: NewContact) -> Result<NewContact, AppError> {
        let mut errors = ValidationErrors::default();
        let name = payload.name.trim().to_string();
        check_name(&name, &mut errors);
        check_email(&payload.email, &mut errors)?;
        check_phone(&payload.phone, &mut errors)?;
        if let Some(address) = &payload.address {
            check_address(address, &mut errors);
        }
        errors.into_result()?;
        Ok(NewContact { name, ..payload })
    }

    /// Validate only the fields present in a patch. Missing fields are not required.
    pub fn validate_partial(patch: ContactPatch) -> Result<ContactPatch, AppError> {
        let mut errors = ValidationErrors::default();
        let name = patch.name.as_deref().map(|n| n.trim().to_string());
        if let Some(name) = &name {
            check_name(name, &mut errors);
        }
        if let Some(email) = &patch.email {
            check_email(email, &mut errors)?;
        }
        if let Some(phone) = &patch.phone {
            check_phone(phone, &mut errors)?;
        }
        if let Some(Some(address)) = &patch.address {
            check_address(address, &mut errors);
        }
        errors.into_result()?;
        Ok(ContactPatch { name, ..patch })
    }
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    let len = name.chars().count();
    if len == 0 {
        errors.push("name", "must not be empty");
    } else if len > NAME_MAX_CHARS {
        errors.push("name", format!("must be at most {} characters", NAME_MAX_CHARS));
    }
}

fn check_email(email: &str, errors: &mut ValidationErrors) -> Result<(), AppError> {
    if email.chars().count() > EMAIL_MAX_CHARS {
        errors.push("email", format!("must be at most {} characters", EMAIL_MAX_CHARS));
    } else if !email_regex()?.is_match(email) {
        errors.push("email", "must be a valid email address");
    }
    Ok(())
}

fn check_phone(phone: &str, errors: &mut ValidationErrors) -> Result<(), AppError> {
    if !phone_regex()?.is_match(phone) {
        errors.push("phone", "must be 10 digits or + followed by 9-15 digits");
    }
    Ok(())
}

fn check_address(address: &str, errors: &mut ValidationErrors) {
    if address.chars().count() > ADDRESS_MAX_CHARS {
        errors.push("address", format!("must be at most {} characters", ADDRESS_MAX_CHARS));
    }
}

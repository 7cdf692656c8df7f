//! Validation errors and shared input checks

use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Input format accepted for collect dates
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// String doesn't match the required format
    #[error("{field} {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Floating point input that is NaN or infinite
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    /// Number too large, or too precise, to be stored as a decimal
    #[error("{field} {value} is outside the storable range or precision")]
    OutOfRange { field: &'static str, value: f64 },

    /// Code is not a member of its parameter domain
    #[error("{label} {value} is not valid, valid types are {valid}")]
    InvalidDomainCode {
        label: &'static str,
        value: i32,
        valid: String,
    },
}

/// Parse a canonical (hyphenated) UUID string.
///
/// Case is ignored; braced, URN and simple forms are rejected.
pub fn parse_uuid(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    let invalid = ValidationError::InvalidFormat {
        field,
        reason: "is not a valid uuid input",
    };

    let uuid = Uuid::parse_str(value).map_err(|_| invalid.clone())?;
    if uuid.hyphenated().to_string() != value.to_ascii_lowercase() {
        return Err(invalid);
    }
    Ok(uuid)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field,
            reason: "is not a valid date input (expected YYYY-MM-DD)",
        }
    })
}

/// Reject NaN and infinite values.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

/// Check that `value` belongs to the id set of a parameter domain.
///
/// The error names the rejected code and lists the valid set.
pub fn ensure_member(
    label: &'static str,
    value: i32,
    valid: &BTreeSet<i32>,
) -> Result<(), ValidationError> {
    if valid.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::InvalidDomainCode {
        label,
        value,
        valid: join_ids(valid),
    })
}

fn join_ids(ids: &BTreeSet<i32>) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

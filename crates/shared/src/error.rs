use std::{fmt::Display, ops::RangeInclusive};

use thiserror::Error;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const INVALID_ACCESS_CODE: &str = "Invalid PIN. Access denied.";

/// Input problems caught before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", FILL_ALL_FIELDS)]
    MissingFields { missing: Vec<&'static str> },
    #[error("{}", INVALID_ACCESS_CODE)]
    InvalidAccessCode,
    #[error("{field} must be a whole number")]
    NotAnInteger { field: &'static str },
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
    },
    #[error("Date played must look like YYYY-MM-DDTHH:MM")]
    InvalidPlayedAt,
}

impl ValidationError {
    pub fn out_of_range<T: Display>(field: &'static str, range: &RangeInclusive<T>) -> Self {
        Self::OutOfRange {
            field,
            min: range.start().to_string(),
            max: range.end().to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;

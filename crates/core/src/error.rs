//! Validation errors for caller-supplied records.

/// Result alias for record validation.
pub type ValidationResult<T = ()> = std::result::Result<T, ValidationError>;

/// A record failed validation before it reached the engine or storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Key result weight must be at least 1
    #[error("{field}: weight must be >= 1")]
    ZeroWeight {
        /// Offending field
        field: String,
    },

    /// Numeric field is NaN or infinite
    #[error("{field}: value must be finite, got {value}")]
    NonFinite {
        /// Offending field
        field: String,
        /// Rejected value
        value: f64,
    },

    /// Required text field is blank
    #[error("{field}: must not be empty")]
    EmptyField {
        /// Offending field
        field: String,
    },

    /// End date precedes start date
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        /// Start date
        start: chrono::NaiveDate,
        /// End date
        end: chrono::NaiveDate,
    },

    /// Integer setting outside its allowed range
    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        /// Offending field
        field: String,
        /// Rejected value
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },

    /// String does not name a known variant
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// Kind of value being parsed
        kind: &'static str,
        /// Rejected input
        value: String,
    },

    /// Free-form field failed a shape check
    #[error("{field}: {reason}")]
    Invalid {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}

pub(crate) fn require_finite(field: &str, value: f64) -> ValidationResult {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

pub(crate) fn require_date_order(
    start: chrono::NaiveDate,
    end: Option<chrono::NaiveDate>,
) -> ValidationResult {
    match end {
        Some(end) if end < start => Err(ValidationError::InvalidDateRange { start, end }),
        _ => Ok(()),
    }
}

//! Errors produced while parsing request query parameters.
//!
//! Every failure is reported as a [`ParseParametersError`] wrapping the
//! specific [`ParamError`], so callers can match on either level:
//!
//! ```
//! use cadence_persistence::params::{ParamError, ParamRegistry, ParameterSet};
//!
//! let registry = ParamRegistry::song_library();
//! let err = ParameterSet::build(
//!     &registry,
//!     vec![("releaseDate".to_string(), vec!["2022.12.20".to_string()])],
//! )
//! .unwrap_err();
//!
//! assert!(err.to_string().starts_with("failed to parse parameters"));
//! assert!(matches!(err.cause(), ParamError::InvalidDateValue { .. }));
//! ```

use std::num::ParseIntError;

use thiserror::Error;

/// The specific reason a single query parameter was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// The name is neither reserved nor present in the registry.
    #[error("unknown parameter '{name}'")]
    UnknownParameter {
        /// The rejected parameter name.
        name: String,
    },

    /// A date literal does not match the `DD.MM.YYYY` layout.
    #[error("invalid date value '{value}', expected DD.MM.YYYY")]
    InvalidDateValue {
        /// The literal that failed to parse.
        value: String,
        /// The chrono failure, when the literal had the right shape.
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// A date range does not split into exactly two dates.
    #[error("invalid date range '{value}', expected DD.MM.YYYY-DD.MM.YYYY")]
    InvalidDateRange {
        /// The rejected range expression.
        value: String,
    },

    /// The limit is not a non-negative integer.
    #[error("invalid limit value '{value}'")]
    InvalidLimitValue {
        /// The rejected value.
        value: String,
        /// The underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The offset is not a non-negative integer.
    #[error("invalid offset value '{value}'")]
    InvalidOffsetValue {
        /// The rejected value.
        value: String,
        /// The underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// General parse failure for a request's parameter set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to parse parameters: {cause}")]
pub struct ParseParametersError {
    #[source]
    cause: ParamError,
}

impl ParseParametersError {
    /// Wraps a specific parameter failure.
    pub fn new(cause: ParamError) -> Self {
        Self { cause }
    }

    /// Returns the specific failure.
    pub fn cause(&self) -> &ParamError {
        &self.cause
    }

    /// Consumes the wrapper and returns the specific failure.
    pub fn into_cause(self) -> ParamError {
        self.cause
    }
}

impl From<ParamError> for ParseParametersError {
    fn from(cause: ParamError) -> Self {
        Self::new(cause)
    }
}

/// Errors raised while assembling a [`ParamRegistry`](super::ParamRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// `limit` and `offset` are reserved and cannot be registered.
    #[error("parameter name '{name}' is reserved")]
    ReservedName {
        /// The reserved name.
        name: String,
    },

    /// Column names are rendered verbatim, so only plain identifiers are allowed.
    #[error("invalid column '{column}' for parameter '{name}'")]
    InvalidColumn {
        /// The parameter being registered.
        name: String,
        /// The rejected column.
        column: String,
    },

    /// The same parameter name was registered twice.
    #[error("parameter '{name}' registered more than once")]
    Duplicate {
        /// The duplicated name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_wrapper_display_includes_cause() {
        let err = ParseParametersError::new(ParamError::UnknownParameter {
            name: "genre".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "failed to parse parameters: unknown parameter 'genre'"
        );
    }

    #[test]
    fn test_source_chain_reaches_specific_cause() {
        let source = "x".parse::<u64>().unwrap_err();
        let err: ParseParametersError = ParamError::InvalidLimitValue {
            value: "x".to_string(),
            source,
        }
        .into();

        let cause = err.source().unwrap();
        assert!(cause.to_string().contains("invalid limit value 'x'"));
        // ParseIntError sits one level further down
        assert!(cause.source().is_some());
        assert!(matches!(
            err.into_cause(),
            ParamError::InvalidLimitValue { .. }
        ));
    }
}

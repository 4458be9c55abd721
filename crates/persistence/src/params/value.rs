//! Typed filter values consumed by the parameter builder.
//!
//! These types know nothing about a particular store's query syntax. The
//! builder renders them into SQL; the memory backend evaluates them directly.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ParamError;

/// Literal layout for every date accepted or returned by the API (`DD.MM.YYYY`).
pub const DATE_LAYOUT: &str = "%d.%m.%Y";

/// Separator between the two dates of a range expression.
pub const RANGE_SEPARATOR: char = '-';

const AFTER_PREFIX: char = '>';
const BEFORE_PREFIX: char = '<';

/// Parses a single `DD.MM.YYYY` literal.
///
/// The literal must be exactly two-digit day, two-digit month and four-digit
/// year. chrono alone would also take `1.1.22` or a leading space.
pub fn parse_date(value: &str) -> Result<NaiveDate, ParamError> {
    if !has_date_shape(value) {
        return Err(ParamError::InvalidDateValue {
            value: value.to_string(),
            source: None,
        });
    }
    NaiveDate::parse_from_str(value, DATE_LAYOUT).map_err(|source| ParamError::InvalidDateValue {
        value: value.to_string(),
        source: Some(source),
    })
}

fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

/// Formats a date using [`DATE_LAYOUT`].
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_LAYOUT).to_string()
}

/// How a date parameter compares against the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    /// Same day.
    Exact,
    /// Strictly later.
    After,
    /// Strictly earlier.
    Before,
    /// Inclusive range.
    Between,
}

impl fmt::Display for DateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DateMode::Exact => "exact",
            DateMode::After => "after",
            DateMode::Before => "before",
            DateMode::Between => "between",
        };
        write!(f, "{}", s)
    }
}

/// A parsed date condition.
///
/// Fields are private so that a `Between` filter can only be built through
/// [`DateFilter::between`], which keeps `primary <= secondary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateFilter {
    mode: DateMode,
    primary: NaiveDate,
    secondary: Option<NaiveDate>,
}

impl DateFilter {
    /// Matches a single day.
    pub fn exact(date: NaiveDate) -> Self {
        Self {
            mode: DateMode::Exact,
            primary: date,
            secondary: None,
        }
    }

    /// Matches days strictly after `date`.
    pub fn after(date: NaiveDate) -> Self {
        Self {
            mode: DateMode::After,
            primary: date,
            secondary: None,
        }
    }

    /// Matches days strictly before `date`.
    pub fn before(date: NaiveDate) -> Self {
        Self {
            mode: DateMode::Before,
            primary: date,
            secondary: None,
        }
    }

    /// Matches the inclusive range between two days, in either order.
    pub fn between(first: NaiveDate, second: NaiveDate) -> Self {
        let (low, high) = if first > second {
            (second, first)
        } else {
            (first, second)
        };
        Self {
            mode: DateMode::Between,
            primary: low,
            secondary: Some(high),
        }
    }

    /// Returns the comparison mode.
    pub fn mode(&self) -> DateMode {
        self.mode
    }

    /// Returns the primary date (the lower bound for ranges).
    pub fn primary(&self) -> NaiveDate {
        self.primary
    }

    /// Returns the upper bound of a range, `None` for every other mode.
    pub fn secondary(&self) -> Option<NaiveDate> {
        self.secondary
    }

    /// Returns true if `date` satisfies this condition.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match (self.mode, self.secondary) {
            (DateMode::Exact, _) => date == self.primary,
            (DateMode::After, _) => date > self.primary,
            (DateMode::Before, _) => date < self.primary,
            (DateMode::Between, Some(high)) => date >= self.primary && date <= high,
            (DateMode::Between, None) => false,
        }
    }

    /// Returns the values a rendered clause binds, in placeholder order.
    pub fn bind_values(&self) -> Vec<BindValue> {
        let mut values = vec![BindValue::Date(self.primary)];
        if let Some(high) = self.secondary {
            values.push(BindValue::Date(high));
        }
        values
    }
}

impl FromStr for DateFilter {
    type Err = ParamError;

    /// Parses `DD.MM.YYYY`, `>DD.MM.YYYY`, `<DD.MM.YYYY` or
    /// `DD.MM.YYYY-DD.MM.YYYY`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = value.strip_prefix(AFTER_PREFIX) {
            return parse_date(rest).map(Self::after);
        }

        if let Some(rest) = value.strip_prefix(BEFORE_PREFIX) {
            return parse_date(rest).map(Self::before);
        }

        if value.contains(RANGE_SEPARATOR) {
            let parts: Vec<&str> = value.split(RANGE_SEPARATOR).collect();
            let [first, second] = parts.as_slice() else {
                return Err(ParamError::InvalidDateRange {
                    value: value.to_string(),
                });
            };
            return Ok(Self::between(parse_date(first)?, parse_date(second)?));
        }

        parse_date(value).map(Self::exact)
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let primary = format_date(self.primary);
        match (self.mode, self.secondary) {
            (DateMode::After, _) => write!(f, "{}{}", AFTER_PREFIX, primary),
            (DateMode::Before, _) => write!(f, "{}{}", BEFORE_PREFIX, primary),
            (DateMode::Between, Some(high)) => {
                write!(f, "{}{}{}", primary, RANGE_SEPARATOR, format_date(high))
            }
            _ => write!(f, "{}", primary),
        }
    }
}

/// A value bound to a query placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindValue {
    /// Text parameter.
    Text(String),
    /// Calendar date parameter.
    Date(NaiveDate),
}

impl BindValue {
    /// Creates a text value.
    pub fn text(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Text(s) => write!(f, "{}", s),
            BindValue::Date(d) => write!(f, "{}", format_date(*d)),
        }
    }
}

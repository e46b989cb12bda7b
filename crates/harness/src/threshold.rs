//! Warning/critical bounds and their evaluation against a measured value.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::status::StatusLevel;

/// A violation region for one severity level.
///
/// Flag syntax mirrors the classic plugin range notation, reduced to the
/// three shapes the checks use:
///
/// * `MAX` — violated when `value >= MAX`
/// * `MIN:` — violated when `value <= MIN`
/// * `MIN:MAX` — violated when the value leaves the open interval `(MIN, MAX)`
///
/// Boundary values are violations: a value exactly equal to a configured
/// limit triggers the corresponding level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Violated at or above the limit.
    Upper(f64),
    /// Violated at or below the limit.
    Lower(f64),
    /// Violated at or outside either limit.
    Outside { min: f64, max: f64 },
}

impl Bounds {
    /// Whether `value` falls in the violation region.
    #[must_use]
    pub fn violated_by(&self, value: f64) -> bool {
        match *self {
            Self::Upper(max) => value >= max,
            Self::Lower(min) => value <= min,
            Self::Outside { min, max } => value <= min || value >= max,
        }
    }
}

/// Error parsing a `--warning`/`--critical` range argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseBoundsError {
    #[error("empty range")]
    Empty,
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("lower limit {min} must be below upper limit {max}")]
    Inverted { min: String, max: String },
}

impl FromStr for Bounds {
    type Err = ParseBoundsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBoundsError::Empty);
        }

        let parse = |part: &str| -> Result<f64, ParseBoundsError> {
            part.parse::<f64>()
                .map_err(|_| ParseBoundsError::NotANumber(part.to_string()))
        };

        match s.split_once(':') {
            None => Ok(Self::Upper(parse(s)?)),
            Some((min, "")) => Ok(Self::Lower(parse(min)?)),
            Some((min_s, max_s)) => {
                let (min, max) = (parse(min_s)?, parse(max_s)?);
                if min >= max {
                    return Err(ParseBoundsError::Inverted {
                        min: min_s.to_string(),
                        max: max_s.to_string(),
                    });
                }
                Ok(Self::Outside { min, max })
            }
        }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Upper(max) => write!(f, "{}", fmt_value(max)),
            Self::Lower(min) => write!(f, "{}:", fmt_value(min)),
            Self::Outside { min, max } => {
                write!(f, "{}:{}", fmt_value(min), fmt_value(max))
            }
        }
    }
}

/// Warning and critical bounds for one check. Either side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Threshold {
    pub warning: Option<Bounds>,
    pub critical: Option<Bounds>,
}

impl Threshold {
    /// A threshold with no bounds; evaluates every value to `Ok`.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(warning: Option<Bounds>, critical: Option<Bounds>) -> Self {
        Self { warning, critical }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warning.is_none() && self.critical.is_none()
    }

    /// Evaluate a measured value: critical wins over warning, otherwise `Ok`.
    #[must_use]
    pub fn evaluate(&self, value: f64) -> StatusLevel {
        if self.critical.is_some_and(|b| b.violated_by(value)) {
            StatusLevel::Critical
        } else if self.warning.is_some_and(|b| b.violated_by(value)) {
            StatusLevel::Warning
        } else {
            StatusLevel::Ok
        }
    }
}

/// Render a float without trailing fractional zeros (`0.23`, not `0.230000`).
pub(crate) fn fmt_value(value: f64) -> String {
    let rendered = format!("{value:.6}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

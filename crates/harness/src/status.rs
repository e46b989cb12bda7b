//! The four-level verdict model and its text/exit-code encoding.
//!
//! The label prefix and the exit code are both load-bearing: the monitoring
//! supervisor classifies a check from `LEVEL:` on the first stdout line and
//! from the process exit code. Neither may drift.

use std::cmp::Ordering;
use std::fmt;

/// Verdict of a single check invocation.
///
/// `Ok < Warning < Critical` by severity. `Unknown` means the check could
/// not determine service state at all (connection refused, timeout, config
/// error) and does not participate in the severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Service behaves within configured bounds.
    Ok,
    /// Service works but a warning bound was violated.
    Warning,
    /// Service is broken or a critical bound was violated.
    Critical,
    /// Service state could not be determined.
    Unknown,
}

impl StatusLevel {
    /// Process exit code consumed by the supervisor.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Uppercase label used as the output prefix.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether the level carries a determinate verdict about the service.
    #[must_use]
    pub fn is_determinate(self) -> bool {
        self != Self::Unknown
    }

    /// Raise a determinate level to at least `floor`.
    ///
    /// `Unknown` is left untouched: an indeterminate verdict cannot be
    /// promoted into a determinate one.
    #[must_use]
    pub fn at_least(self, floor: StatusLevel) -> StatusLevel {
        match self.partial_cmp(&floor) {
            Some(Ordering::Less) => floor,
            _ => self,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            // Unreachable through PartialOrd; kept total for completeness.
            Self::Unknown => u8::MAX,
        }
    }
}

impl PartialOrd for StatusLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Unknown, Self::Unknown) => Some(Ordering::Equal),
            (Self::Unknown, _) | (_, Self::Unknown) => None,
            _ => Some(self.rank().cmp(&other.rank())),
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_plugin_contract() {
        assert_eq!(StatusLevel::Ok.exit_code(), 0);
        assert_eq!(StatusLevel::Warning.exit_code(), 1);
        assert_eq!(StatusLevel::Critical.exit_code(), 2);
        assert_eq!(StatusLevel::Unknown.exit_code(), 3);
    }

    #[test]
    fn labels_are_uppercase() {
        assert_eq!(StatusLevel::Ok.label(), "OK");
        assert_eq!(StatusLevel::Warning.label(), "WARNING");
        assert_eq!(StatusLevel::Critical.label(), "CRITICAL");
        assert_eq!(StatusLevel::Unknown.label(), "UNKNOWN");
    }

    #[test]
    fn severity_is_totally_ordered_for_determinate_levels() {
        assert!(StatusLevel::Ok < StatusLevel::Warning);
        assert!(StatusLevel::Warning < StatusLevel::Critical);
        assert!(StatusLevel::Ok < StatusLevel::Critical);
    }

    #[test]
    fn unknown_is_not_comparable() {
        assert_eq!(
            StatusLevel::Unknown.partial_cmp(&StatusLevel::Critical),
            None
        );
        assert_eq!(StatusLevel::Ok.partial_cmp(&StatusLevel::Unknown), None);
        assert_eq!(
            StatusLevel::Unknown.partial_cmp(&StatusLevel::Unknown),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn at_least_raises_the_floor() {
        assert_eq!(
            StatusLevel::Ok.at_least(StatusLevel::Warning),
            StatusLevel::Warning
        );
        assert_eq!(
            StatusLevel::Critical.at_least(StatusLevel::Warning),
            StatusLevel::Critical
        );
        assert_eq!(
            StatusLevel::Unknown.at_least(StatusLevel::Warning),
            StatusLevel::Unknown
        );
    }
}

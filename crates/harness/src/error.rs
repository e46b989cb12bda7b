//! Configuration-resolution errors.

use thiserror::Error;

/// A credential or parameter could not be resolved before execution.
///
/// Raised while building a check's configuration, always before any network
/// call; the harness reports it as `UNKNOWN` and never runs the probe.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential was supplied neither as a flag nor through the
    /// environment.
    #[error("missing credential: set {flag} or {env}")]
    MissingCredential {
        flag: &'static str,
        env: &'static str,
    },

    /// A required non-credential argument is absent.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A flag was present but its value does not parse.
    #[error("invalid value for {flag}: {reason}")]
    InvalidValue { flag: &'static str, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn invalid(flag: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            flag,
            reason: reason.into(),
        }
    }
}

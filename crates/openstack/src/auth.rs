//! Credential set for Keystone v3 password authentication.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which catalog endpoint variant to select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interface {
    #[default]
    Public,
    Internal,
    Admin,
}

impl Interface {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an `--os-interface` value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown interface {0:?}, expected public, internal or admin")]
pub struct ParseInterfaceError(String);

impl FromStr for Interface {
    type Err = ParseInterfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" | "publicURL" => Ok(Self::Public),
            "internal" | "internalURL" => Ok(Self::Internal),
            "admin" | "adminURL" => Ok(Self::Admin),
            other => Err(ParseInterfaceError(other.to_string())),
        }
    }
}

/// Fully resolved credential set for one invocation.
///
/// Resolution from flags and `OS_*` environment variables happens in the
/// CLI layer; by the time this struct exists every required field is
/// present. Passed by value into each check, never cached process-wide.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Keystone base URL, e.g. `https://keystone.example.net:5000/v3`.
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub user_domain: String,
    pub project_domain: String,
    /// Restrict catalog lookup to this region when set.
    pub region: Option<String>,
    pub interface: Interface,
    /// Bypass the catalog entirely and talk to this endpoint.
    pub endpoint_override: Option<String>,
}

impl Credentials {
    /// The v3 password-auth request body.
    #[must_use]
    pub fn token_request(&self) -> serde_json::Value {
        serde_json::json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": self.username,
                            "domain": { "name": self.user_domain },
                            "password": self.password,
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": self.project_name,
                        "domain": { "name": self.project_domain },
                    }
                }
            }
        })
    }
}

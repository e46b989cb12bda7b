//! Shared flag groups and their resolution into check configuration.
//!
//! Required credentials are declared optional at the clap level on purpose:
//! a missing credential must surface as an `UNKNOWN` check result (exit 3),
//! not as a clap usage error. Resolution happens here, before any network
//! traffic, and feeds the harness's configuration-error path.

use std::time::Duration;

use clap::Args;

use harness::{Bounds, CheckConfig, ConfigError, ParseBoundsError, Threshold, DEFAULT_TIMEOUT};
use openstack::{Credentials, Interface, ParseInterfaceError};

/// OpenStack credential flags with `OS_*` environment fallback.
#[derive(Debug, Clone, Args)]
pub struct AuthArgs {
    /// Keystone endpoint, e.g. https://keystone.example.net:5000/v3
    #[arg(long, env = "OS_AUTH_URL", value_name = "URL")]
    pub os_auth_url: Option<String>,

    /// User to authenticate as
    #[arg(long, env = "OS_USERNAME", value_name = "NAME")]
    pub os_username: Option<String>,

    /// Password for the user
    #[arg(long, env = "OS_PASSWORD", hide_env_values = true, value_name = "SECRET")]
    pub os_password: Option<String>,

    /// Project to scope the token to
    #[arg(
        long,
        env = "OS_PROJECT_NAME",
        visible_alias = "os-tenant-name",
        value_name = "NAME"
    )]
    pub os_project_name: Option<String>,

    /// Domain of the user
    #[arg(long, env = "OS_USER_DOMAIN_NAME", default_value = "Default")]
    pub os_user_domain_name: String,

    /// Domain of the project
    #[arg(long, env = "OS_PROJECT_DOMAIN_NAME", default_value = "Default")]
    pub os_project_domain_name: String,

    /// Restrict catalog lookup to this region
    #[arg(long, env = "OS_REGION_NAME", value_name = "REGION")]
    pub os_region_name: Option<String>,

    /// Catalog interface to select: public, internal or admin
    #[arg(long, env = "OS_INTERFACE", default_value = "public")]
    pub os_interface: String,

    /// Bypass the catalog and use this service endpoint directly
    #[arg(long, value_name = "URL")]
    pub os_endpoint_url: Option<String>,
}

impl AuthArgs {
    /// Turn the flag group into a fully resolved credential set.
    pub fn resolve(self) -> Result<Credentials, ConfigError> {
        let auth_url = self.os_auth_url.ok_or(ConfigError::MissingCredential {
            flag: "--os-auth-url",
            env: "OS_AUTH_URL",
        })?;
        let username = self.os_username.ok_or(ConfigError::MissingCredential {
            flag: "--os-username",
            env: "OS_USERNAME",
        })?;
        let password = self.os_password.ok_or(ConfigError::MissingCredential {
            flag: "--os-password",
            env: "OS_PASSWORD",
        })?;
        let project_name = self.os_project_name.ok_or(ConfigError::MissingCredential {
            flag: "--os-project-name",
            env: "OS_PROJECT_NAME",
        })?;
        let interface: Interface = self
            .os_interface
            .parse()
            .map_err(|err: ParseInterfaceError| {
                ConfigError::invalid("--os-interface", err.to_string())
            })?;

        Ok(Credentials {
            auth_url,
            username,
            password,
            project_name,
            user_domain: self.os_user_domain_name,
            project_domain: self.os_project_domain_name,
            region: self.os_region_name,
            interface,
            endpoint_override: self.os_endpoint_url,
        })
    }
}

/// Flags every check shares: the time budget and the thresholds.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Overall time budget for the check, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<String>,

    /// Warning range: MAX, MIN: or MIN:MAX (boundary values violate)
    #[arg(short = 'w', long, value_name = "RANGE")]
    pub warning: Option<String>,

    /// Critical range: MAX, MIN: or MIN:MAX (boundary values violate)
    #[arg(short = 'c', long, value_name = "RANGE")]
    pub critical: Option<String>,
}

impl CommonArgs {
    /// Build the per-invocation check configuration.
    pub fn check_config(&self) -> Result<CheckConfig, ConfigError> {
        let timeout = match self.timeout.as_deref() {
            None => DEFAULT_TIMEOUT,
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ConfigError::invalid("--timeout", format!("{raw:?} is not a whole number of seconds"))
                })?;
                if secs == 0 {
                    return Err(ConfigError::invalid("--timeout", "must be at least 1 second"));
                }
                Duration::from_secs(secs)
            }
        };

        Ok(CheckConfig {
            timeout,
            threshold: Threshold::new(
                parse_bounds("--warning", self.warning.as_deref())?,
                parse_bounds("--critical", self.critical.as_deref())?,
            ),
        })
    }
}

fn parse_bounds(flag: &'static str, raw: Option<&str>) -> Result<Option<Bounds>, ConfigError> {
    raw.map(|value| {
        value
            .parse()
            .map_err(|err: ParseBoundsError| ConfigError::invalid(flag, err.to_string()))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_auth() -> AuthArgs {
        AuthArgs {
            os_auth_url: Some("http://keystone:5000/v3".into()),
            os_username: Some("monitor".into()),
            os_password: Some("secret".into()),
            os_project_name: Some("ops".into()),
            os_user_domain_name: "Default".into(),
            os_project_domain_name: "Default".into(),
            os_region_name: None,
            os_interface: "public".into(),
            os_endpoint_url: None,
        }
    }

    fn common(timeout: Option<&str>, warning: Option<&str>, critical: Option<&str>) -> CommonArgs {
        CommonArgs {
            timeout: timeout.map(Into::into),
            warning: warning.map(Into::into),
            critical: critical.map(Into::into),
        }
    }

    #[test]
    fn resolves_a_complete_credential_set() {
        let creds = full_auth().resolve().unwrap();
        assert_eq!(creds.username, "monitor");
        assert_eq!(creds.interface, Interface::Public);
    }

    #[test]
    fn missing_password_names_flag_and_env() {
        let mut args = full_auth();
        args.os_password = None;
        let err = args.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing credential: set --os-password or OS_PASSWORD"
        );
    }

    #[test]
    fn bad_interface_is_a_config_error() {
        let mut args = full_auth();
        args.os_interface = "publik".into();
        let err = args.resolve().unwrap_err();
        assert!(err.to_string().contains("--os-interface"));
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        let config = common(None, None, None).check_config().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.threshold.is_empty());
    }

    #[test]
    fn timeout_flag_overrides_the_default() {
        let config = common(Some("5"), None, None).check_config().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_or_garbage_timeout_is_rejected() {
        assert!(common(Some("0"), None, None).check_config().is_err());
        assert!(common(Some("soon"), None, None).check_config().is_err());
        assert!(common(Some("1.5"), None, None).check_config().is_err());
    }

    #[test]
    fn threshold_flags_are_parsed_as_ranges() {
        let config = common(None, Some("80"), Some("90")).check_config().unwrap();
        assert_eq!(config.threshold.warning, Some(Bounds::Upper(80.0)));
        assert_eq!(config.threshold.critical, Some(Bounds::Upper(90.0)));
    }

    #[test]
    fn malformed_range_is_a_config_error() {
        let err = common(None, None, Some("lots"))
            .check_config()
            .unwrap_err();
        assert!(err.to_string().contains("--critical"));
    }
}

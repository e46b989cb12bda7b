//! Health-check probes for an OpenStack-based cloud.
//!
//! Each subcommand of the `oschecks` binary runs exactly one probe against
//! one service and reports in the plugin contract the monitoring
//! supervisor expects: `LEVEL: message[ | perfdata]` on stdout and exit
//! code 0/1/2/3. The shared execution discipline (timeouts, thresholds,
//! error mapping) lives in the `harness` crate; this crate contributes the
//! service specifics and the CLI surface.

pub mod args;
pub mod probes;

pub use args::{AuthArgs, CommonArgs};

use harness::{CheckConfig, CheckResult, ConfigError, Probe};

/// Fold configuration resolution and probe execution into one result.
///
/// Both the check configuration and the probe carry their resolution
/// outcome; either failing reports `UNKNOWN` without any network traffic.
pub async fn run_check<P: Probe>(
    config: Result<CheckConfig, ConfigError>,
    probe: Result<P, ConfigError>,
) -> CheckResult {
    match config {
        Ok(config) => harness::execute(probe, &config).await,
        Err(err) => CheckResult::unknown(err.to_string()),
    }
}

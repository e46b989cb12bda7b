//! Storage-cluster check: Ceph health plus raw capacity usage.
//!
//! Shells out to the `ceph` CLI like the other cluster tooling on a
//! monitoring host would; there is no stable HTTP surface on every Ceph
//! release we need to support.

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::Args;
use serde::Deserialize;
use std::process::Output;
use tokio::process::Command;

use harness::{ConfigError, Measurement, Outcome, Perfdata, Probe};

/// Flags for reaching the Ceph cluster.
#[derive(Debug, Clone, Args)]
pub struct CephArgs {
    /// Ceph executable to invoke
    #[arg(long, default_value = "ceph", value_name = "PATH")]
    pub ceph_bin: String,

    /// Cluster configuration file (-c)
    #[arg(long, value_name = "FILE")]
    pub conf: Option<String>,

    /// Client id to authenticate as (--id)
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,
}

/// Maps `ceph health` to the verdict and `ceph df` to the measurement.
pub struct CephDfProbe {
    args: CephArgs,
}

impl CephDfProbe {
    pub fn prepare(args: CephArgs) -> Result<Self, ConfigError> {
        if args.ceph_bin.trim().is_empty() {
            return Err(ConfigError::invalid("--ceph-bin", "must not be empty"));
        }
        Ok(Self { args })
    }

    async fn run_ceph(&self, subcommand: &[&str]) -> anyhow::Result<Output> {
        let mut command = Command::new(&self.args.ceph_bin);
        if let Some(conf) = &self.args.conf {
            command.arg("-c").arg(conf);
        }
        if let Some(id) = &self.args.id {
            command.arg("--id").arg(id);
        }
        // The timeout guard may drop us mid-call; the child must die with us.
        command.args(subcommand).kill_on_drop(true);

        let output = command
            .output()
            .await
            .with_context(|| format!("failed to run {:?}", self.args.ceph_bin))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{:?} {} exited with {}: {}",
                self.args.ceph_bin,
                subcommand.join(" "),
                output.status,
                stderr.lines().next().unwrap_or("no output")
            );
        }
        Ok(output)
    }
}

#[derive(Debug, Deserialize)]
struct DfReport {
    stats: DfStats,
}

#[derive(Debug, Deserialize)]
struct DfStats {
    total_bytes: u64,
    // Older releases report total_used_bytes, newer ones add the raw figure.
    #[serde(default)]
    total_used_bytes: Option<u64>,
    #[serde(default)]
    total_used_raw_bytes: Option<u64>,
}

#[async_trait]
impl Probe for CephDfProbe {
    fn service(&self) -> &str {
        "ceph"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let health = self.run_ceph(&["health"]).await?;
        let health_line = String::from_utf8_lossy(&health.stdout)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        let df = self.run_ceph(&["df", "--format", "json"]).await?;
        let report: DfReport =
            serde_json::from_slice(&df.stdout).context("ceph df returned unparseable JSON")?;
        let total = report.stats.total_bytes;
        let used = report
            .stats
            .total_used_raw_bytes
            .or(report.stats.total_used_bytes)
            .context("ceph df report carries no used-bytes figure")?;
        if total == 0 {
            bail!("ceph df reports zero total capacity");
        }
        let percent = used as f64 / total as f64 * 100.0;

        let base = if health_line == "HEALTH_OK" {
            Outcome::success(format!("cluster healthy, {percent:.1}% raw capacity used"))
        } else if health_line.starts_with("HEALTH_WARN") {
            Outcome::degraded(health_line)
        } else if health_line.starts_with("HEALTH_ERR") {
            Outcome::service_failure(health_line)
        } else {
            bail!("unrecognized ceph health output: {health_line:?}");
        };

        Ok(base
            .with_measurement(Measurement::percent("raw_used", percent))
            .with_metric(Perfdata::bytes("used", used as f64).with_max(total as f64))
            .with_metric(Perfdata::bytes("total", total as f64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn df_report_accepts_old_and_new_field_names() {
        let old: DfReport = serde_json::from_str(
            r#"{ "stats": { "total_bytes": 100, "total_used_bytes": 40 } }"#,
        )
        .unwrap();
        assert_eq!(old.stats.total_used_bytes, Some(40));

        let new: DfReport = serde_json::from_str(
            r#"{ "stats": { "total_bytes": 100, "total_used_bytes": 35, "total_used_raw_bytes": 40 } }"#,
        )
        .unwrap();
        assert_eq!(new.stats.total_used_raw_bytes, Some(40));
    }

    #[test]
    fn empty_binary_path_is_rejected() {
        let args = CephArgs {
            ceph_bin: String::new(),
            conf: None,
            id: None,
        };
        assert!(CephDfProbe::prepare(args).is_err());
    }
}

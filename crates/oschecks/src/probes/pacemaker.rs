//! Cluster-manager check: Pacemaker status via `crm_mon`.

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::Args;
use tokio::process::Command;

use harness::{ConfigError, Outcome, Probe};

#[derive(Debug, Clone, Args)]
pub struct PacemakerArgs {
    /// crm_mon executable to invoke
    #[arg(long, default_value = "crm_mon", value_name = "PATH")]
    pub crm_bin: String,
}

/// Parses the one-line summary of `crm_mon --simple-status`.
pub struct PacemakerProbe {
    args: PacemakerArgs,
}

impl PacemakerProbe {
    pub fn prepare(args: PacemakerArgs) -> Result<Self, ConfigError> {
        if args.crm_bin.trim().is_empty() {
            return Err(ConfigError::invalid("--crm-bin", "must not be empty"));
        }
        Ok(Self { args })
    }
}

#[async_trait]
impl Probe for PacemakerProbe {
    fn service(&self) -> &str {
        "pacemaker"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let output = Command::new(&self.args.crm_bin)
            .arg("--simple-status")
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {:?}", self.args.crm_bin))?;

        let summary = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        if !output.status.success() {
            // crm_mon exits nonzero when it cannot reach the cluster stack
            // at all; that is indeterminate, not a verdict.
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "crm_mon exited with {}: {}",
                output.status,
                stderr.lines().next().unwrap_or(&summary)
            );
        }

        if summary.starts_with("CLUSTER OK") {
            if summary.to_ascii_lowercase().contains("offline") {
                return Ok(Outcome::degraded(summary));
            }
            return Ok(Outcome::success(summary));
        }

        Ok(Outcome::service_failure(if summary.is_empty() {
            "crm_mon did not report CLUSTER OK".to_string()
        } else {
            summary
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_binary_path_is_rejected() {
        let args = PacemakerArgs {
            crm_bin: "  ".into(),
        };
        assert!(PacemakerProbe::prepare(args).is_err());
    }

    #[tokio::test]
    async fn non_cluster_output_is_a_service_failure() {
        // `echo --simple-status` exits 0 but prints the flag back, which is
        // not a CLUSTER OK line.
        let probe = PacemakerProbe::prepare(PacemakerArgs {
            crm_bin: "echo".into(),
        })
        .unwrap();
        let outcome = probe.observe().await.unwrap();
        assert!(matches!(outcome, Outcome::ServiceFailure(_)));
    }

    #[tokio::test]
    async fn missing_binary_is_an_error_not_a_verdict() {
        let probe = PacemakerProbe::prepare(PacemakerArgs {
            crm_bin: "/nonexistent/crm_mon".into(),
        })
        .unwrap();
        assert!(probe.observe().await.is_err());
    }
}

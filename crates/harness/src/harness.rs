//! Orchestration of one check invocation.
//!
//! One invocation walks a fixed path: resolve configuration, run the probe
//! body under the timeout guard, judge the outcome, report. Every path ends
//! in exactly one [`CheckResult`]; nothing escapes as an error or panic.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::outcome::{Measurement, Outcome};
use crate::perfdata::Perfdata;
use crate::status::StatusLevel;
use crate::threshold::Threshold;
use crate::timeout::run_bounded;

/// Time budget applied when `--timeout` is not given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-invocation execution parameters. Built once from the CLI, read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Upper bound on the whole probe body, auth included.
    pub timeout: Duration,
    /// Warning/critical bounds applied to the probe's measurement.
    pub threshold: Threshold,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            threshold: Threshold::none(),
        }
    }
}

/// Service-specific check logic, opaque to the harness.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Short service name used in timeout and error messages, e.g. `nova-api`.
    fn service(&self) -> &str;

    /// Perform the single service call.
    ///
    /// Anticipated service-side problems must be folded into the returned
    /// [`Outcome`]; an `Err` is treated as unclassified and reported as
    /// `UNKNOWN`.
    async fn observe(&self) -> anyhow::Result<Outcome>;
}

/// The one report a check invocation produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    status: StatusLevel,
    message: String,
    metrics: Vec<Perfdata>,
}

impl CheckResult {
    #[must_use]
    pub fn new(status: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            metrics: Vec::new(),
        }
    }

    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Unknown, message)
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Vec<Perfdata>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusLevel {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn metrics(&self) -> &[Perfdata] {
        &self.metrics
    }

    /// The supervisor-facing first line: `LEVEL: message[ | perfdata]`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = format!("{}: {}", self.status.label(), self.message);
        if !self.metrics.is_empty() {
            let perf: Vec<String> = self.metrics.iter().map(ToString::to_string).collect();
            line.push_str(" | ");
            line.push_str(&perf.join(" "));
        }
        line
    }

    /// Print the status line and terminate with the matching exit code.
    pub fn exit(self) -> ! {
        println!("{}", self.render());
        std::process::exit(self.status.exit_code())
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Run one check invocation to completion.
///
/// `probe` carries the result of configuration resolution: a resolution
/// failure reports `UNKNOWN` without touching the network. The probe body
/// runs under the timeout guard; its outcome is judged against
/// `config.threshold`. When the probe supplies no measurement of its own,
/// the wall-clock duration of the call (in seconds) is judged instead.
pub async fn execute<P: Probe>(
    probe: Result<P, ConfigError>,
    config: &CheckConfig,
) -> CheckResult {
    let probe = match probe {
        Ok(probe) => probe,
        Err(err) => {
            warn!(error = %err, "check configuration unresolved");
            return CheckResult::unknown(err.to_string());
        }
    };

    let service = probe.service().to_string();
    debug!(service = %service, timeout_secs = config.timeout.as_secs(), "starting probe");

    let started = Instant::now();
    let outcome = match run_bounded(probe.observe(), config.timeout).await {
        Err(deadline) => {
            warn!(service = %service, "probe hit its deadline");
            return CheckResult::unknown(format!("{service} did not answer: {deadline}"));
        }
        Ok(Err(err)) => {
            warn!(service = %service, error = %err, "probe failed unexpectedly");
            return CheckResult::unknown(format!("{service}: {}", summarize(&err)));
        }
        Ok(Ok(outcome)) => outcome,
    };
    let elapsed = started.elapsed().as_secs_f64();

    judge(&service, outcome, elapsed, config)
}

/// Map an outcome to the final result (the EVALUATING step).
fn judge(service: &str, outcome: Outcome, elapsed: f64, config: &CheckConfig) -> CheckResult {
    let threshold = &config.threshold;

    let (status, observation) = match outcome {
        Outcome::Success(obs) => {
            let value = obs.measurement.as_ref().map_or(elapsed, |m| m.value);
            (threshold.evaluate(value), obs)
        }
        Outcome::Degraded(obs) => {
            let value = obs.measurement.as_ref().map_or(elapsed, |m| m.value);
            (
                threshold.evaluate(value).at_least(StatusLevel::Warning),
                obs,
            )
        }
        Outcome::ServiceFailure(obs) => {
            let status = obs
                .measurement
                .as_ref()
                .map_or(StatusLevel::Critical, |m| threshold.evaluate(m.value));
            (status, obs)
        }
    };

    let mut metrics = Vec::new();
    let primary = observation.measurement.as_ref();
    if let Some(reading) = primary {
        metrics.push(measurement_perfdata(reading, threshold));
    }
    metrics.extend(observation.metrics);
    if primary.map_or(true, |m| m.name != "time") {
        let mut time = Perfdata::seconds("time", elapsed);
        if primary.is_none() {
            // Elapsed time was the judged reading; carry the bounds with it.
            time = time.with_threshold(threshold);
        }
        metrics.push(time);
    }

    debug!(service = %service, status = %status, "probe judged");
    CheckResult::new(status, observation.message).with_metrics(metrics)
}

fn measurement_perfdata(reading: &Measurement, threshold: &Threshold) -> Perfdata {
    let mut perf = Perfdata::new(reading.name.clone(), reading.value).with_threshold(threshold);
    perf.unit = reading.unit.clone();
    perf.min = reading.min;
    perf.max = reading.max;
    perf
}

/// Flatten an error chain to a single line for the status message.
fn summarize(err: &anyhow::Error) -> String {
    let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
    chain.join(": ").replace('\n', "; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::Bounds;

    struct StaticProbe {
        outcome: Outcome,
    }

    #[async_trait]
    impl Probe for StaticProbe {
        fn service(&self) -> &str {
            "static"
        }

        async fn observe(&self) -> anyhow::Result<Outcome> {
            Ok(self.outcome.clone())
        }
    }

    fn upper(warning: f64, critical: f64) -> CheckConfig {
        CheckConfig {
            timeout: Duration::from_secs(10),
            threshold: Threshold::new(Some(Bounds::Upper(warning)), Some(Bounds::Upper(critical))),
        }
    }

    #[tokio::test]
    async fn config_error_reports_unknown_without_running() {
        let config = CheckConfig::default();
        let result = execute::<StaticProbe>(
            Err(ConfigError::MissingCredential {
                flag: "--os-username",
                env: "OS_USERNAME",
            }),
            &config,
        )
        .await;
        assert_eq!(result.status(), StatusLevel::Unknown);
        assert!(result.render().starts_with("UNKNOWN: missing credential"));
        assert!(result.metrics().is_empty());
    }

    #[tokio::test]
    async fn measurement_is_judged_against_thresholds() {
        let probe = StaticProbe {
            outcome: Outcome::success("95 messages")
                .with_measurement(Measurement::new("messages", 95.0)),
        };
        let result = execute(Ok(probe), &upper(80.0, 90.0)).await;
        assert_eq!(result.status(), StatusLevel::Critical);
        assert!(result.render().starts_with("CRITICAL: 95 messages"));
    }

    #[tokio::test]
    async fn service_failure_without_measurement_is_critical() {
        let probe = StaticProbe {
            outcome: Outcome::service_failure("listing returned HTTP 500"),
        };
        let result = execute(Ok(probe), &CheckConfig::default()).await;
        assert_eq!(result.status(), StatusLevel::Critical);
    }

    #[tokio::test]
    async fn service_failure_with_measurement_is_judged() {
        let probe = StaticProbe {
            outcome: Outcome::service_failure("queue is backed up")
                .with_measurement(Measurement::new("messages", 50.0)),
        };
        let result = execute(Ok(probe), &upper(80.0, 90.0)).await;
        assert_eq!(result.status(), StatusLevel::Ok);
    }

    #[tokio::test]
    async fn degraded_is_at_least_warning() {
        let probe = StaticProbe {
            outcome: Outcome::degraded("HEALTH_WARN: 1 osd down")
                .with_measurement(Measurement::percent("raw_used", 10.0)),
        };
        let result = execute(Ok(probe), &upper(80.0, 90.0)).await;
        assert_eq!(result.status(), StatusLevel::Warning);
    }

    #[tokio::test]
    async fn probe_error_reports_unknown_single_line() {
        struct FailingProbe;

        #[async_trait]
        impl Probe for FailingProbe {
            fn service(&self) -> &str {
                "failing"
            }

            async fn observe(&self) -> anyhow::Result<Outcome> {
                Err(anyhow::anyhow!("boom\nwith details").context("connection reset"))
            }
        }

        let result = execute(Ok(FailingProbe), &CheckConfig::default()).await;
        assert_eq!(result.status(), StatusLevel::Unknown);
        assert!(!result.render().contains('\n'));
        assert!(result.message().contains("connection reset"));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_probe_reports_timeout() {
        struct HangingProbe;

        #[async_trait]
        impl Probe for HangingProbe {
            fn service(&self) -> &str {
                "hanging"
            }

            async fn observe(&self) -> anyhow::Result<Outcome> {
                std::future::pending().await
            }
        }

        let config = CheckConfig {
            timeout: Duration::from_secs(5),
            threshold: Threshold::none(),
        };
        let result = execute(Ok(HangingProbe), &config).await;
        assert_eq!(result.status(), StatusLevel::Unknown);
        assert!(result.message().contains("timeout"));
        assert!(result.message().contains('5'));
    }

    #[tokio::test]
    async fn elapsed_time_is_always_reported() {
        let probe = StaticProbe {
            outcome: Outcome::success("fine"),
        };
        let result = execute(Ok(probe), &CheckConfig::default()).await;
        assert_eq!(result.metrics().len(), 1);
        assert_eq!(result.metrics()[0].label, "time");
        assert_eq!(result.metrics()[0].unit.as_deref(), Some("s"));
    }

    #[tokio::test]
    async fn probe_measurement_and_time_are_both_reported() {
        let probe = StaticProbe {
            outcome: Outcome::success("7 queued")
                .with_measurement(Measurement::new("messages", 7.0))
                .with_metric(Perfdata::count("consumers", 2)),
        };
        let result = execute(Ok(probe), &upper(80.0, 90.0)).await;
        let labels: Vec<&str> = result.metrics().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["messages", "consumers", "time"]);
        // Bounds travel with the judged reading, not with the wall clock.
        assert_eq!(result.metrics()[0].warning.as_deref(), Some("80"));
        assert!(result.metrics()[2].warning.is_none());
    }

    #[test]
    fn render_joins_metrics_with_spaces() {
        let result = CheckResult::new(StatusLevel::Ok, "all good").with_metrics(vec![
            Perfdata::count("a", 1),
            Perfdata::count("b", 2),
        ]);
        assert_eq!(result.render(), "OK: all good | a=1 b=2");
    }
}

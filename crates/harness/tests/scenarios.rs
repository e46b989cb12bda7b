//! End-to-end behavior of the harness, driven through fake probes.
//!
//! Mirrors how the supervisor sees a check: first line prefix plus exit
//! code, for each of the canonical situations a probe can end up in.

use std::time::Duration;

use async_trait::async_trait;
use harness::{
    execute, Bounds, CheckConfig, ConfigError, Measurement, Outcome, Probe, StatusLevel, Threshold,
};

/// A probe that reports a fixed queue depth.
struct DepthProbe {
    depth: f64,
}

#[async_trait]
impl Probe for DepthProbe {
    fn service(&self) -> &str {
        "amqp"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        Ok(
            Outcome::success(format!("{} messages queued", self.depth))
                .with_measurement(Measurement::new("messages", self.depth)),
        )
    }
}

/// A probe whose service call never returns.
struct StuckProbe;

#[async_trait]
impl Probe for StuckProbe {
    fn service(&self) -> &str {
        "glance-api"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        std::future::pending().await
    }
}

/// A probe whose service answered with an error.
struct BrokenProbe;

#[async_trait]
impl Probe for BrokenProbe {
    fn service(&self) -> &str {
        "amqp"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        Ok(Outcome::service_failure(
            "queue depth endpoint returned HTTP 500",
        ))
    }
}

fn config_80_90() -> CheckConfig {
    CheckConfig {
        timeout: Duration::from_secs(10),
        threshold: Threshold::new(Some(Bounds::Upper(80.0)), Some(Bounds::Upper(90.0))),
    }
}

#[tokio::test]
async fn missing_credential_is_unknown_exit_3() {
    let missing: Result<DepthProbe, ConfigError> = Err(ConfigError::MissingCredential {
        flag: "--os-password",
        env: "OS_PASSWORD",
    });
    let result = execute(missing, &CheckConfig::default()).await;

    assert_eq!(result.status().exit_code(), 3);
    assert!(result.render().starts_with("UNKNOWN:"));
}

#[tokio::test]
async fn measurement_over_critical_is_critical_exit_2() {
    let result = execute(Ok(DepthProbe { depth: 95.0 }), &config_80_90()).await;

    assert_eq!(result.status().exit_code(), 2);
    assert!(result.render().starts_with("CRITICAL:"));
}

#[tokio::test]
async fn measurement_in_bounds_is_ok_exit_0() {
    let result = execute(Ok(DepthProbe { depth: 50.0 }), &config_80_90()).await;

    assert_eq!(result.status().exit_code(), 0);
    assert!(result.render().starts_with("OK:"));
}

#[tokio::test]
async fn measurement_between_bounds_is_warning_exit_1() {
    let result = execute(Ok(DepthProbe { depth: 85.0 }), &config_80_90()).await;

    assert_eq!(result.status().exit_code(), 1);
    assert!(result.render().starts_with("WARNING:"));
}

#[tokio::test(start_paused = true)]
async fn hung_service_call_is_unknown_and_names_the_budget() {
    let config = CheckConfig {
        timeout: Duration::from_secs(5),
        threshold: Threshold::none(),
    };
    let result = execute(Ok(StuckProbe), &config).await;

    assert_eq!(result.status().exit_code(), 3);
    assert!(result.render().starts_with("UNKNOWN:"));
    assert!(result.message().contains("timeout"));
    assert!(result.message().contains('5'));
}

#[tokio::test]
async fn service_failure_without_measurement_is_critical_exit_2() {
    let result = execute(Ok(BrokenProbe), &CheckConfig::default()).await;

    assert_eq!(result.status().exit_code(), 2);
    assert!(result.render().starts_with("CRITICAL:"));
    assert!(result.message().contains("HTTP 500"));
}

#[tokio::test]
async fn every_invocation_yields_exactly_one_line() {
    let result = execute(Ok(DepthProbe { depth: 12.0 }), &config_80_90()).await;
    let rendered = result.render();

    assert_eq!(rendered.lines().count(), 1);
    // Perfdata suffix is separated by a pipe and carries the bounds.
    let (_, perf) = rendered.split_once(" | ").expect("perfdata suffix");
    assert!(perf.contains("messages=12;80;90"));
}

#[tokio::test]
async fn status_is_printable_via_display() {
    let result = execute(Ok(DepthProbe { depth: 12.0 }), &config_80_90()).await;
    assert_eq!(format!("{result}"), result.render());
    assert_eq!(result.status(), StatusLevel::Ok);
}

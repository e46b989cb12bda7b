//! Probe results before status-level mapping.
//!
//! Probes convert whatever their client library signals (non-2xx responses,
//! empty result sets, degraded cluster health) into this sum type at their
//! own boundary; the harness then maps it exhaustively instead of catching
//! arbitrary error values.

use crate::perfdata::Perfdata;

/// A numeric reading the threshold evaluator can judge.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Perfdata label, e.g. `time` or `messages`.
    pub name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Measurement {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: None,
            min: None,
            max: None,
        }
    }

    /// Elapsed seconds.
    #[must_use]
    pub fn seconds(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value).with_unit("s")
    }

    /// A 0–100 percentage.
    #[must_use]
    pub fn percent(name: impl Into<String>, value: f64) -> Self {
        let mut m = Self::new(name, value).with_unit("%");
        m.min = Some(0.0);
        m.max = Some(100.0);
        m
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Payload shared by every outcome variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    /// Human-readable summary used as the status-line message.
    pub message: String,
    /// Primary reading, judged by the threshold evaluator when present.
    pub measurement: Option<Measurement>,
    /// Additional metrics appended to the perfdata suffix as-is.
    pub metrics: Vec<Perfdata>,
}

/// What a probe observed, before the harness maps it to a status level.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The service answered and looks healthy.
    Success(Observation),
    /// The service answered but is impaired (e.g. `HEALTH_WARN`); at least
    /// a warning regardless of thresholds.
    Degraded(Observation),
    /// The service answered with an error indication. Critical outright,
    /// unless a measurement is attached for the evaluator to judge.
    ServiceFailure(Observation),
}

impl Outcome {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(Observation {
            message: message.into(),
            ..Observation::default()
        })
    }

    #[must_use]
    pub fn degraded(message: impl Into<String>) -> Self {
        Self::Degraded(Observation {
            message: message.into(),
            ..Observation::default()
        })
    }

    #[must_use]
    pub fn service_failure(message: impl Into<String>) -> Self {
        Self::ServiceFailure(Observation {
            message: message.into(),
            ..Observation::default()
        })
    }

    #[must_use]
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.observation_mut().measurement = Some(measurement);
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: Perfdata) -> Self {
        self.observation_mut().metrics.push(metric);
        self
    }

    #[must_use]
    pub fn observation(&self) -> &Observation {
        match self {
            Self::Success(o) | Self::Degraded(o) | Self::ServiceFailure(o) => o,
        }
    }

    fn observation_mut(&mut self) -> &mut Observation {
        match self {
            Self::Success(o) | Self::Degraded(o) | Self::ServiceFailure(o) => o,
        }
    }
}

//! Performance-data rendering for the `| label=value;warn;crit;min;max` suffix.

use std::fmt;

use crate::threshold::{fmt_value, Threshold};

/// One performance metric appended after the status line.
///
/// Rendered as `label=value[unit];warn;crit;min;max` with trailing empty
/// fields trimmed. Labels containing spaces are single-quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Perfdata {
    pub label: String,
    pub value: f64,
    pub unit: Option<String>,
    pub warning: Option<String>,
    pub critical: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Perfdata {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            unit: None,
            warning: None,
            critical: None,
            min: None,
            max: None,
        }
    }

    /// Unit-less integer counter (flavors, volumes, containers).
    #[must_use]
    pub fn count(label: impl Into<String>, value: usize) -> Self {
        Self::new(label, value as f64)
    }

    /// Elapsed seconds.
    #[must_use]
    pub fn seconds(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, value).with_unit("s")
    }

    /// Raw byte total.
    #[must_use]
    pub fn bytes(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, value).with_unit("B").with_min(0.0)
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Attach the configured bounds so the supervisor can graph them.
    #[must_use]
    pub fn with_threshold(mut self, threshold: &Threshold) -> Self {
        self.warning = threshold.warning.map(|b| b.to_string());
        self.critical = threshold.critical.map(|b| b.to_string());
        self
    }
}

impl fmt::Display for Perfdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.contains(' ') {
            write!(f, "'{}'=", self.label)?;
        } else {
            write!(f, "{}=", self.label)?;
        }
        write!(f, "{}", fmt_value(self.value))?;
        if let Some(unit) = &self.unit {
            f.write_str(unit)?;
        }

        let fields = [
            self.warning.clone(),
            self.critical.clone(),
            self.min.map(fmt_value),
            self.max.map(fmt_value),
        ];
        let last_set = fields.iter().rposition(Option::is_some);
        if let Some(last) = last_set {
            for field in &fields[..=last] {
                write!(f, ";{}", field.as_deref().unwrap_or(""))?;
            }
        }
        Ok(())
    }
}

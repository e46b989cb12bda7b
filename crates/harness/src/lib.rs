//! Shared check-execution harness for the service probes.
//!
//! Every probe is one process invocation against one service, reported in
//! the classic plugin contract: a `LEVEL: message[ | perfdata]` line on
//! stdout and an exit code of 0/1/2/3. This crate owns everything the
//! probes have in common — the status protocol, the threshold evaluator,
//! the timeout guard, and the [`execute`] orchestration that ties them
//! together. Service specifics stay in the probe crates.

pub mod error;
pub mod harness;
pub mod outcome;
pub mod perfdata;
pub mod status;
pub mod threshold;
pub mod timeout;

pub use error::ConfigError;
pub use harness::{execute, CheckConfig, CheckResult, Probe, DEFAULT_TIMEOUT};
pub use outcome::{Measurement, Observation, Outcome};
pub use perfdata::Perfdata;
pub use status::StatusLevel;
pub use threshold::{Bounds, ParseBoundsError, Threshold};
pub use timeout::{run_bounded, DeadlineExceeded};

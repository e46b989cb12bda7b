//! Bounded execution of a probe body.
//!
//! The probe future is raced against a deadline and dropped when the
//! deadline fires, so a peer that never answers cannot hang the check.
//! Anything the probe holds (sockets, child process handles) must release
//! on drop; subprocess probes set `kill_on_drop` for this reason.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The probe did not complete within its time budget.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("timeout after {} seconds", .limit.as_secs())]
pub struct DeadlineExceeded {
    /// The configured budget that was exhausted.
    pub limit: Duration,
}

/// Run `work` to completion unless `limit` elapses first.
///
/// On success the work's output is returned unchanged. Past the deadline the
/// work future is cancelled and a [`DeadlineExceeded`] names the configured
/// budget. A timeout is terminal for the invocation; nothing is retried.
pub async fn run_bounded<F>(work: F, limit: Duration) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    tokio::time::timeout(limit, work)
        .await
        .map_err(|_| DeadlineExceeded { limit })
}

//! One module per monitored service.
//!
//! Every probe follows the same discipline: anticipated service-side
//! problems (rejected credentials, non-2xx answers, missing catalog
//! entries, degraded cluster health) become an [`Outcome`]; anything else
//! propagates as an error and is reported indeterminate by the harness.

pub mod amqp;
pub mod ceph;
pub mod compute;
pub mod identity;
pub mod image;
pub mod network;
pub mod object_storage;
pub mod pacemaker;
pub mod telemetry;
pub mod volume;

pub use amqp::{AmqpArgs, AmqpProbe};
pub use ceph::{CephArgs, CephDfProbe};
pub use compute::NovaApiProbe;
pub use identity::KeystoneProbe;
pub use image::GlanceApiProbe;
pub use network::NeutronApiProbe;
pub use object_storage::SwiftApiProbe;
pub use pacemaker::{PacemakerArgs, PacemakerProbe};
pub use telemetry::CeilometerApiProbe;
pub use volume::CinderApiProbe;

use harness::Outcome;
use openstack::{AuthError, KeystoneClient, Session};

/// Result of the authentication step of an OpenStack probe.
pub(crate) enum SessionStart {
    Ready(Session),
    /// Authentication itself decided the verdict; stop here.
    Abort(Outcome),
}

/// Authenticate, folding a credential rejection into a service failure.
///
/// Keystone answering with an error code is a determinate verdict (the
/// service spoke, the check cannot proceed); an unreachable or garbled
/// identity service is not, and propagates as an error.
pub(crate) async fn start_session(keystone: &KeystoneClient) -> anyhow::Result<SessionStart> {
    match keystone.authenticate().await {
        Ok(session) => Ok(SessionStart::Ready(session)),
        Err(err @ AuthError::Rejected { .. }) => {
            Ok(SessionStart::Abort(Outcome::service_failure(err.to_string())))
        }
        Err(err) => Err(anyhow::Error::new(err)),
    }
}

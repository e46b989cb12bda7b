//! Identity service check: can Keystone issue a project-scoped token?

use async_trait::async_trait;
use harness::{ConfigError, Outcome, Probe};
use openstack::KeystoneClient;

use crate::args::AuthArgs;
use crate::probes::{start_session, SessionStart};

/// Issues a token and nothing else; latency is the measurement.
pub struct KeystoneProbe {
    keystone: KeystoneClient,
}

impl KeystoneProbe {
    pub fn prepare(auth: AuthArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            keystone: KeystoneClient::new(auth.resolve()?),
        })
    }
}

#[async_trait]
impl Probe for KeystoneProbe {
    fn service(&self) -> &str {
        "keystone"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        match start_session(&self.keystone).await? {
            SessionStart::Abort(outcome) => Ok(outcome),
            SessionStart::Ready(_session) => Ok(Outcome::success(format!(
                "identity API issued a token for {}",
                self.keystone.username()
            ))),
        }
    }
}

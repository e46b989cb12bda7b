//! Compute API check: list flavors, the cheapest authenticated Nova call.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use harness::{ConfigError, Outcome, Perfdata, Probe};
use openstack::KeystoneClient;

use crate::args::AuthArgs;
use crate::probes::{start_session, SessionStart};

pub struct NovaApiProbe {
    keystone: KeystoneClient,
}

impl NovaApiProbe {
    pub fn prepare(auth: AuthArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            keystone: KeystoneClient::new(auth.resolve()?),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FlavorList {
    flavors: Vec<serde_json::Value>,
}

#[async_trait]
impl Probe for NovaApiProbe {
    fn service(&self) -> &str {
        "nova-api"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let session = match start_session(&self.keystone).await? {
            SessionStart::Ready(session) => session,
            SessionStart::Abort(outcome) => return Ok(outcome),
        };
        let endpoint = match session.endpoint("compute") {
            Ok(url) => url,
            Err(err) => return Ok(Outcome::service_failure(err.to_string())),
        };

        let response = session
            .get(&format!("{endpoint}/flavors"))
            .await
            .context("compute API request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Outcome::service_failure(format!(
                "compute API returned HTTP {}",
                status.as_u16()
            )));
        }

        let list: FlavorList = response
            .json()
            .await
            .context("compute API returned unparseable JSON")?;
        let count = list.flavors.len();

        Ok(
            Outcome::success(format!("nova-api is answering ({count} flavors)"))
                .with_metric(Perfdata::count("flavors", count)),
        )
    }
}

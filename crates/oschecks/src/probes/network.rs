//! Network API check: list networks through the Neutron v2.0 endpoint.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use harness::{ConfigError, Outcome, Perfdata, Probe};
use openstack::KeystoneClient;

use crate::args::AuthArgs;
use crate::probes::{start_session, SessionStart};

pub struct NeutronApiProbe {
    keystone: KeystoneClient,
}

impl NeutronApiProbe {
    pub fn prepare(auth: AuthArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            keystone: KeystoneClient::new(auth.resolve()?),
        })
    }
}

#[derive(Debug, Deserialize)]
struct NetworkList {
    networks: Vec<serde_json::Value>,
}

#[async_trait]
impl Probe for NeutronApiProbe {
    fn service(&self) -> &str {
        "neutron-api"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let session = match start_session(&self.keystone).await? {
            SessionStart::Ready(session) => session,
            SessionStart::Abort(outcome) => return Ok(outcome),
        };
        let endpoint = match session.endpoint("network") {
            Ok(url) => url,
            Err(err) => return Ok(Outcome::service_failure(err.to_string())),
        };

        let response = session
            .get(&format!("{endpoint}/v2.0/networks"))
            .await
            .context("network API request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Outcome::service_failure(format!(
                "network API returned HTTP {}",
                status.as_u16()
            )));
        }

        let list: NetworkList = response
            .json()
            .await
            .context("network API returned unparseable JSON")?;
        let count = list.networks.len();

        Ok(
            Outcome::success(format!("neutron-api is answering ({count} networks)"))
                .with_metric(Perfdata::count("networks", count)),
        )
    }
}

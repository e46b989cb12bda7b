//! Object-storage check: list the account's containers.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use harness::{ConfigError, Outcome, Perfdata, Probe};
use openstack::KeystoneClient;

use crate::args::AuthArgs;
use crate::probes::{start_session, SessionStart};

pub struct SwiftApiProbe {
    keystone: KeystoneClient,
}

impl SwiftApiProbe {
    pub fn prepare(auth: AuthArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            keystone: KeystoneClient::new(auth.resolve()?),
        })
    }
}

#[derive(Debug, Deserialize)]
struct Container {
    #[allow(dead_code)]
    name: String,
    #[serde(default)]
    bytes: u64,
}

#[async_trait]
impl Probe for SwiftApiProbe {
    fn service(&self) -> &str {
        "swift-api"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let session = match start_session(&self.keystone).await? {
            SessionStart::Ready(session) => session,
            SessionStart::Abort(outcome) => return Ok(outcome),
        };
        let endpoint = match session.endpoint("object-store") {
            Ok(url) => url,
            Err(err) => return Ok(Outcome::service_failure(err.to_string())),
        };

        let response = session
            .get(&format!("{endpoint}?format=json"))
            .await
            .context("object storage API request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Outcome::service_failure(format!(
                "object storage API returned HTTP {}",
                status.as_u16()
            )));
        }

        let containers: Vec<Container> = response
            .json()
            .await
            .context("object storage API returned unparseable JSON")?;
        let count = containers.len();
        let stored: u64 = containers.iter().map(|c| c.bytes).sum();

        Ok(
            Outcome::success(format!("swift-api is answering ({count} containers)"))
                .with_metric(Perfdata::count("containers", count))
                .with_metric(Perfdata::bytes("stored", stored as f64)),
        )
    }
}

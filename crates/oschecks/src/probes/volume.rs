//! Block-storage API check: list volumes.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use harness::{ConfigError, Outcome, Perfdata, Probe};
use openstack::KeystoneClient;

use crate::args::AuthArgs;
use crate::probes::{start_session, SessionStart};

pub struct CinderApiProbe {
    keystone: KeystoneClient,
}

impl CinderApiProbe {
    pub fn prepare(auth: AuthArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            keystone: KeystoneClient::new(auth.resolve()?),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VolumeList {
    volumes: Vec<serde_json::Value>,
}

#[async_trait]
impl Probe for CinderApiProbe {
    fn service(&self) -> &str {
        "cinder-api"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let session = match start_session(&self.keystone).await? {
            SessionStart::Ready(session) => session,
            SessionStart::Abort(outcome) => return Ok(outcome),
        };
        // Catalogs register block storage as volumev3 these days; older
        // clouds still announce the bare volume type.
        let endpoint = match session
            .endpoint("volumev3")
            .or_else(|_| session.endpoint("volume"))
        {
            Ok(url) => url,
            Err(err) => return Ok(Outcome::service_failure(err.to_string())),
        };

        let response = session
            .get(&format!("{endpoint}/volumes"))
            .await
            .context("block storage API request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Outcome::service_failure(format!(
                "block storage API returned HTTP {}",
                status.as_u16()
            )));
        }

        let list: VolumeList = response
            .json()
            .await
            .context("block storage API returned unparseable JSON")?;
        let count = list.volumes.len();

        Ok(
            Outcome::success(format!("cinder-api is answering ({count} volumes)"))
                .with_metric(Perfdata::count("volumes", count)),
        )
    }
}

//! Telemetry API check: list meters through the Ceilometer v2 endpoint.

use anyhow::Context;
use async_trait::async_trait;

use harness::{ConfigError, Outcome, Perfdata, Probe};
use openstack::KeystoneClient;

use crate::args::AuthArgs;
use crate::probes::{start_session, SessionStart};

pub struct CeilometerApiProbe {
    keystone: KeystoneClient,
}

impl CeilometerApiProbe {
    pub fn prepare(auth: AuthArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            keystone: KeystoneClient::new(auth.resolve()?),
        })
    }
}

#[async_trait]
impl Probe for CeilometerApiProbe {
    fn service(&self) -> &str {
        "ceilometer-api"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let session = match start_session(&self.keystone).await? {
            SessionStart::Ready(session) => session,
            SessionStart::Abort(outcome) => return Ok(outcome),
        };
        let endpoint = match session.endpoint("metering") {
            Ok(url) => url,
            Err(err) => return Ok(Outcome::service_failure(err.to_string())),
        };

        let response = session
            .get(&format!("{endpoint}/v2/meters"))
            .await
            .context("telemetry API request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Outcome::service_failure(format!(
                "telemetry API returned HTTP {}",
                status.as_u16()
            )));
        }

        let meters: Vec<serde_json::Value> = response
            .json()
            .await
            .context("telemetry API returned unparseable JSON")?;
        let count = meters.len();

        Ok(
            Outcome::success(format!("ceilometer-api is answering ({count} meters)"))
                .with_metric(Perfdata::count("meters", count)),
        )
    }
}

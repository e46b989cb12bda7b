//! Image API check: list images through the v2 endpoint.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use harness::{ConfigError, Outcome, Perfdata, Probe};
use openstack::KeystoneClient;

use crate::args::AuthArgs;
use crate::probes::{start_session, SessionStart};

pub struct GlanceApiProbe {
    keystone: KeystoneClient,
}

impl GlanceApiProbe {
    pub fn prepare(auth: AuthArgs) -> Result<Self, ConfigError> {
        Ok(Self {
            keystone: KeystoneClient::new(auth.resolve()?),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ImageList {
    images: Vec<serde_json::Value>,
}

#[async_trait]
impl Probe for GlanceApiProbe {
    fn service(&self) -> &str {
        "glance-api"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let session = match start_session(&self.keystone).await? {
            SessionStart::Ready(session) => session,
            SessionStart::Abort(outcome) => return Ok(outcome),
        };
        let endpoint = match session.endpoint("image") {
            Ok(url) => url,
            Err(err) => return Ok(Outcome::service_failure(err.to_string())),
        };

        let response = session
            .get(&format!("{endpoint}/v2/images"))
            .await
            .context("image API request failed")?;
        let status = response.status();
        if !status.is_success() {
            return Ok(Outcome::service_failure(format!(
                "image API returned HTTP {}",
                status.as_u16()
            )));
        }

        let list: ImageList = response
            .json()
            .await
            .context("image API returned unparseable JSON")?;
        let count = list.images.len();

        Ok(
            Outcome::success(format!("glance-api is answering ({count} images)"))
                .with_metric(Perfdata::count("images", count)),
        )
    }
}

//! Message-broker check: queue depth through the RabbitMQ management API.

use anyhow::Context;
use async_trait::async_trait;
use clap::Args;
use serde::Deserialize;

use harness::{ConfigError, Measurement, Outcome, Perfdata, Probe};

/// Flags for the broker's management API.
#[derive(Debug, Clone, Args)]
pub struct AmqpArgs {
    /// Management API host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Management API port
    #[arg(long, default_value_t = 15672)]
    pub port: u16,

    /// Management API user
    #[arg(long, default_value = "guest")]
    pub user: String,

    /// Management API password
    #[arg(long, default_value = "guest", env = "AMQP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Virtual host holding the queue
    #[arg(long, default_value = "/")]
    pub vhost: String,

    /// Queue to measure; broker-wide totals when omitted
    #[arg(long, value_name = "NAME")]
    pub queue: Option<String>,

    /// Use HTTPS towards the management API
    #[arg(long)]
    pub tls: bool,
}

/// Reads the depth of one queue, or the broker-wide queue totals.
pub struct AmqpProbe {
    args: AmqpArgs,
    http: reqwest::Client,
}

impl AmqpProbe {
    pub fn prepare(args: AmqpArgs) -> Result<Self, ConfigError> {
        if args.queue.as_deref().is_some_and(|q| q.trim().is_empty()) {
            return Err(ConfigError::invalid("--queue", "must not be empty"));
        }
        Ok(Self {
            args,
            http: reqwest::Client::new(),
        })
    }

    fn base_url(&self) -> String {
        let scheme = if self.args.tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.args.host, self.args.port)
    }
}

#[derive(Debug, Deserialize)]
struct QueueInfo {
    #[serde(default)]
    messages: u64,
    #[serde(default)]
    consumers: u64,
}

#[derive(Debug, Deserialize)]
struct Overview {
    queue_totals: QueueTotals,
}

#[derive(Debug, Deserialize, Default)]
struct QueueTotals {
    #[serde(default)]
    messages: u64,
}

#[async_trait]
impl Probe for AmqpProbe {
    fn service(&self) -> &str {
        "amqp"
    }

    async fn observe(&self) -> anyhow::Result<Outcome> {
        let base = self.base_url();
        let url = match &self.args.queue {
            Some(queue) => format!(
                "{base}/api/queues/{}/{}",
                urlencoding::encode(&self.args.vhost),
                urlencoding::encode(queue)
            ),
            None => format!("{base}/api/overview"),
        };

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.args.user, Some(&self.args.password))
            .send()
            .await
            .context("management API request failed")?;
        let status = response.status();

        if status.as_u16() == 404 {
            if let Some(queue) = &self.args.queue {
                return Ok(Outcome::service_failure(format!(
                    "queue {queue:?} not found on vhost {:?}",
                    self.args.vhost
                )));
            }
        }
        if !status.is_success() {
            return Ok(Outcome::service_failure(format!(
                "queue depth endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        match &self.args.queue {
            Some(queue) => {
                let info: QueueInfo = response
                    .json()
                    .await
                    .context("management API returned unparseable JSON")?;
                Ok(Outcome::success(format!(
                    "queue {queue:?} holds {} messages",
                    info.messages
                ))
                .with_measurement(Measurement::new("messages", info.messages as f64))
                .with_metric(Perfdata::count("consumers", info.consumers as usize)))
            }
            None => {
                let overview: Overview = response
                    .json()
                    .await
                    .context("management API returned unparseable JSON")?;
                let messages = overview.queue_totals.messages;
                Ok(
                    Outcome::success(format!("broker reports {messages} queued messages"))
                        .with_measurement(Measurement::new("messages", messages as f64)),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AmqpArgs {
        AmqpArgs {
            host: "localhost".into(),
            port: 15672,
            user: "guest".into(),
            password: "guest".into(),
            vhost: "/".into(),
            queue: None,
            tls: false,
        }
    }

    #[test]
    fn empty_queue_name_is_rejected() {
        let mut bad = args();
        bad.queue = Some("  ".into());
        assert!(AmqpProbe::prepare(bad).is_err());
    }

    #[test]
    fn base_url_respects_tls_flag() {
        let plain = AmqpProbe::prepare(args()).unwrap();
        assert_eq!(plain.base_url(), "http://localhost:15672");

        let mut secure_args = args();
        secure_args.tls = true;
        secure_args.port = 15671;
        let secure = AmqpProbe::prepare(secure_args).unwrap();
        assert_eq!(secure.base_url(), "https://localhost:15671");
    }
}

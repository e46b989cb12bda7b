//! Token issue against Keystone and service-catalog endpoint resolution.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::auth::{Credentials, Interface};

/// Failure while obtaining a token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never produced a usable response (connect refused, TLS,
    /// decode failure). The service state is indeterminate.
    #[error("identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Keystone answered but refused the credentials or the request.
    #[error("identity service rejected the token request (HTTP {status})")]
    Rejected { status: u16 },

    /// Keystone answered 2xx but the response lacks a required part.
    #[error("identity response missing {0}")]
    MalformedResponse(&'static str),
}

/// The requested service has no matching endpoint in the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no {interface} endpoint for service type {service_type:?} in the catalog")]
pub struct EndpointNotFound {
    pub service_type: String,
    pub interface: Interface,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogService>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogService {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogEndpoint {
    interface: String,
    url: String,
    #[serde(default)]
    region: Option<String>,
}

/// Unauthenticated client; one [`authenticate`](Self::authenticate) call
/// turns it into a [`Session`].
#[derive(Debug, Clone)]
pub struct KeystoneClient {
    http: reqwest::Client,
    creds: Credentials,
}

impl KeystoneClient {
    #[must_use]
    pub fn new(creds: Credentials) -> Self {
        // No client-level timeout: the caller's deadline governs the call.
        Self {
            http: reqwest::Client::new(),
            creds,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.creds.username
    }

    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.creds.auth_url
    }

    /// Issue a project-scoped token.
    pub async fn authenticate(&self) -> Result<Session, AuthError> {
        let url = format!("{}/auth/tokens", self.creds.auth_url.trim_end_matches('/'));
        debug!(url = %url, username = %self.creds.username, "requesting token");

        let response = self
            .http
            .post(&url)
            .json(&self.creds.token_request())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let token = response
            .headers()
            .get("x-subject-token")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or(AuthError::MalformedResponse("X-Subject-Token header"))?;

        let payload: TokenResponse = response.json().await?;
        debug!(
            services = payload.token.catalog.len(),
            "token issued, catalog received"
        );

        Ok(Session {
            http: self.http.clone(),
            token,
            catalog: payload.token.catalog,
            interface: self.creds.interface,
            region: self.creds.region.clone(),
            endpoint_override: self.creds.endpoint_override.clone(),
        })
    }
}

/// An issued token plus the catalog it came with.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    token: String,
    catalog: Vec<CatalogService>,
    interface: Interface,
    region: Option<String>,
    endpoint_override: Option<String>,
}

impl Session {
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Resolve the base URL for a service type.
    ///
    /// An explicit endpoint override always wins. Otherwise the catalog is
    /// searched for an endpoint matching the configured interface and, when
    /// set, the configured region. The returned URL carries no trailing
    /// slash.
    pub fn endpoint(&self, service_type: &str) -> Result<String, EndpointNotFound> {
        if let Some(url) = &self.endpoint_override {
            return Ok(url.trim_end_matches('/').to_string());
        }

        self.catalog
            .iter()
            .filter(|service| service.service_type == service_type)
            .flat_map(|service| &service.endpoints)
            .find(|endpoint| {
                endpoint.interface == self.interface.as_str()
                    && self
                        .region
                        .as_ref()
                        .map_or(true, |region| endpoint.region.as_ref() == Some(region))
            })
            .map(|endpoint| endpoint.url.trim_end_matches('/').to_string())
            .ok_or_else(|| EndpointNotFound {
                service_type: service_type.to_string(),
                interface: self.interface,
            })
    }

    /// Authenticated GET. Status handling stays with the caller so service
    /// errors can be folded into a check outcome.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        debug!(url = %url, "authenticated GET");
        self.http
            .get(url)
            .header("X-Auth-Token", &self.token)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_catalog(catalog: Vec<CatalogService>) -> Session {
        Session {
            http: reqwest::Client::new(),
            token: "tok".into(),
            catalog,
            interface: Interface::Public,
            region: None,
            endpoint_override: None,
        }
    }

    fn service(service_type: &str, endpoints: Vec<CatalogEndpoint>) -> CatalogService {
        CatalogService {
            service_type: service_type.into(),
            endpoints,
        }
    }

    fn endpoint(interface: &str, url: &str, region: Option<&str>) -> CatalogEndpoint {
        CatalogEndpoint {
            interface: interface.into(),
            url: url.into(),
            region: region.map(Into::into),
        }
    }

    #[test]
    fn picks_endpoint_by_interface() {
        let session = session_with_catalog(vec![service(
            "compute",
            vec![
                endpoint("internal", "http://internal:8774/v2.1", None),
                endpoint("public", "http://public:8774/v2.1/", None),
            ],
        )]);

        assert_eq!(
            session.endpoint("compute").unwrap(),
            "http://public:8774/v2.1"
        );
    }

    #[test]
    fn respects_region_when_configured() {
        let mut session = session_with_catalog(vec![service(
            "volumev3",
            vec![
                endpoint("public", "http://one:8776/v3", Some("RegionOne")),
                endpoint("public", "http://two:8776/v3", Some("RegionTwo")),
            ],
        )]);
        session.region = Some("RegionTwo".into());

        assert_eq!(session.endpoint("volumev3").unwrap(), "http://two:8776/v3");
    }

    #[test]
    fn override_bypasses_the_catalog() {
        let mut session = session_with_catalog(Vec::new());
        session.endpoint_override = Some("http://direct:9292/".into());

        assert_eq!(session.endpoint("image").unwrap(), "http://direct:9292");
    }

    #[test]
    fn missing_service_is_reported() {
        let session = session_with_catalog(Vec::new());
        let err = session.endpoint("object-store").unwrap_err();
        assert_eq!(err.service_type, "object-store");
        assert_eq!(err.interface, Interface::Public);
    }
}

// Peer node HTTP client
//
// Wraps `reqwest::Client` with profile URL construction and envelope
// unwrapping. The notification endpoints live in `notify.rs` as inherent
// methods so this module stays focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::API_VERSION;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{Response, ResponseKind};

/// HTTP client for a single peer node.
///
/// Every request carries the cluster notification marker (installed by
/// [`TransportConfig::build_client`]). Methods return unwrapped
/// `metadata` payloads; error envelopes become [`Error::Remote`].
#[derive(Debug, Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl NodeClient {
    /// Create a client for the node at `base_url` from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::validate_base(&base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for any default headers; tests use this
    /// to point a plain client at a mock server.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Self::validate_base(&base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: 0,
        })
    }

    /// The node base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn validate_base(url: &Url) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(url.to_string()));
        }
        Ok(())
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/1.0/profiles[/{name}]?project={project}`.
    ///
    /// Names are pushed as path segments, so they are percent-encoded.
    pub(crate) fn profiles_url(&self, name: Option<&str>, project: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(API_VERSION).push("profiles");
            if let Some(name) = name {
                segments.push(name);
            }
        }
        url.query_pairs_mut().append_pair("project", project);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request with a JSON body and unwrap the envelope.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("{method} {url}");

        let resp = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        parse_envelope(resp).await
    }

    /// Send a body-less request and unwrap the envelope.
    pub(crate) async fn send_empty<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: Url,
    ) -> Result<Option<T>, Error> {
        debug!("{method} {url}");

        let resp = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        parse_envelope(resp).await
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() && self.timeout_secs > 0 {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Parse the `{ type, error_code, error, metadata }` envelope.
///
/// An empty body with a success status is accepted as an empty sync
/// response.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if body.trim().is_empty() {
        if status.is_success() {
            return Ok(None);
        }
        return Err(Error::Remote {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("empty error response")
                .into(),
        });
    }

    let envelope: Response<T> =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;

    match envelope.kind {
        ResponseKind::Sync if status.is_success() => Ok(envelope.metadata),
        ResponseKind::Sync | ResponseKind::Error => {
            let code = if envelope.error_code == 0 {
                status.as_u16()
            } else {
                envelope.error_code
            };
            let message = if envelope.error.is_empty() {
                format!("request failed with status {code}")
            } else {
                envelope.error
            };
            Err(Error::Remote {
                status: code,
                message,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn profiles_url_encodes_name_and_project() {
        let client =
            NodeClient::from_reqwest("https://node2:8443", reqwest::Client::new()).unwrap();
        let url = client.profiles_url(Some("web tier"), "team-a").unwrap();
        assert_eq!(
            url.as_str(),
            "https://node2:8443/1.0/profiles/web%20tier?project=team-a"
        );
    }

    #[test]
    fn profiles_url_keeps_base_path() {
        let client =
            NodeClient::from_reqwest("https://gw.example/cluster/", reqwest::Client::new())
                .unwrap();
        let url = client.profiles_url(None, "default").unwrap();
        assert_eq!(
            url.as_str(),
            "https://gw.example/cluster/1.0/profiles?project=default"
        );
    }

    #[test]
    fn rejects_non_base_url() {
        let err = NodeClient::from_reqwest("mailto:ops@example.com", reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl(_)));
    }
}

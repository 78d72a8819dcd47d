// Shared transport configuration for building reqwest::Client instances.
//
// Every peer client shares TLS, timeout, and cluster-secret settings
// through this module, so the notifier builds one client per peer with
// identical behavior.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;
use crate::{CLUSTER_TOKEN_HEADER, NOTIFICATION_HEADER};

/// TLS verification mode for peer connections.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed cluster members).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Per-request bound; one slow peer never blocks longer than this.
    pub timeout: Duration,
    /// Shared cluster secret sent with every notification.
    pub cluster_token: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(10),
            cluster_token: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` for cluster notifications.
    ///
    /// The notification marker (and the cluster token, when set) are
    /// installed as default headers so no call site can forget them.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(NOTIFICATION_HEADER, HeaderValue::from_static("1"));
        if let Some(ref token) = self.cluster_token {
            let mut value = HeaderValue::from_str(token.expose_secret())
                .map_err(|e| Error::Tls(format!("invalid cluster token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(CLUSTER_TOKEN_HEADER, value);
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("profiled-notifier/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Timeout in whole seconds, for error reporting.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}

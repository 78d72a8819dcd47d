// ── Runtime service configuration ──
//
// These types describe how this node behaves and how it reaches its
// peers. They carry the cluster secret but never touch disk; the CLI
// builds them from `profiled-config` and hands them in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::model::DEFAULT_NAMESPACE;

/// TLS verification strategy for peer connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed cluster certificates).
    DangerAcceptInvalid,
}

/// A single cluster member reachable over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerConfig {
    pub name: String,
    pub url: Url,
}

/// How this node talks to the rest of the cluster.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Every other member; this node is never listed.
    pub peers: Vec<PeerConfig>,
    pub tls: TlsVerification,
    /// Upper bound on a single peer notification.
    pub timeout: Duration,
    /// Shared secret presented to peers.
    pub token: Option<SecretString>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            peers: Vec::new(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            token: None,
        }
    }
}

/// Configuration for the profile service on one node.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Name of this node, used in logs.
    pub node_name: String,
    /// Namespace non-isolated projects fall back to.
    pub default_namespace: String,
    /// Upper bound on each peer notification during propagation.
    pub propagation_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            node_name: "local".into(),
            default_namespace: DEFAULT_NAMESPACE.into(),
            propagation_timeout: Duration::from_secs(10),
        }
    }
}

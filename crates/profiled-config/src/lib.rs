//! Node configuration for profiled.
//!
//! TOML file + `PROFILED_` environment layering, cluster token resolution
//! (env + keyring + plaintext), and translation to the `profiled_core`
//! service, cluster, and project types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use profiled_core::{
    ClusterConfig, DEFAULT_NAMESPACE, PeerConfig, ServiceConfig, StaticProjects, TlsVerification,
};

/// Keyring service name the cluster token is stored under.
pub const KEYRING_SERVICE: &str = "profiled";

/// Keyring entry holding the cluster token.
pub const KEYRING_TOKEN_ENTRY: &str = "cluster-token";

/// Environment variable consulted for the cluster token.
pub const TOKEN_ENV: &str = "PROFILED_CLUSTER_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub cluster: ClusterSection,

    /// Known projects, keyed by name.
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectSection>,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NodeSection {
    /// Name of this node in logs.
    #[serde(default = "default_node_name")]
    pub name: String,

    /// JSON state file. Defaults to the platform data dir.
    pub state_file: Option<PathBuf>,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            name: default_node_name(),
            state_file: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ClusterSection {
    /// Other members to notify after local writes.
    #[serde(default)]
    pub peers: Vec<PeerEntry>,

    /// Per-member notification bound, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed member certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Shared cluster secret in plaintext. Prefer the keyring or an env var.
    pub token: Option<String>,

    /// Environment variable name containing the cluster secret.
    pub token_env: Option<String>,
}

impl Default for ClusterSection {
    fn default() -> Self {
        Self {
            peers: Vec::new(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            token: None,
            token_env: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PeerEntry {
    pub name: String,
    /// Base URL, e.g. "https://10.0.0.2:8443".
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectSection {
    /// Whether the project keeps its own profiles.
    #[serde(default = "default_true")]
    pub profiles: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_project")]
    pub project: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            project: default_project(),
        }
    }
}

fn default_node_name() -> String {
    "local".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_output() -> String {
    "table".into()
}
fn default_project() -> String {
    DEFAULT_NAMESPACE.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "profiled", "profiled")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("profiled");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the state file: `[node] state_file`, else the platform data dir.
pub fn state_path(cfg: &Config) -> PathBuf {
    if let Some(ref path) = cfg.node.state_file {
        return path.clone();
    }
    project_dirs().map_or_else(
        || dirs_fallback().join("state.json"),
        |dirs| dirs.data_dir().join("state.json"),
    )
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load the full Config: defaults, then the TOML file, then `PROFILED_*`
/// env vars (`__` separates sections, e.g. `PROFILED_NODE__NAME`).
///
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PROFILED_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Serialize config to pretty TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Secret resolution ───────────────────────────────────────────────

/// Resolve the shared cluster token, if any.
///
/// Order: env var named by `token_env`, `PROFILED_CLUSTER_TOKEN`, system
/// keyring, plaintext `token`.
pub fn resolve_cluster_token(cluster: &ClusterSection) -> Option<SecretString> {
    if let Some(ref env_name) = cluster.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Some(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_ENTRY) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    cluster
        .token
        .as_ref()
        .map(|token| SecretString::from(token.clone()))
}

// ── Translation to core types ───────────────────────────────────────

pub fn to_service_config(cfg: &Config) -> ServiceConfig {
    ServiceConfig {
        node_name: cfg.node.name.clone(),
        default_namespace: DEFAULT_NAMESPACE.into(),
        propagation_timeout: Duration::from_secs(cfg.cluster.timeout),
    }
}

/// Build the peer list without resolving the token.
pub fn to_cluster_config(cfg: &Config) -> Result<ClusterConfig, ConfigError> {
    let peers = cfg
        .cluster
        .peers
        .iter()
        .map(|peer| {
            let url = peer.url.parse().map_err(|_| ConfigError::Validation {
                field: format!("cluster.peers.{}.url", peer.name),
                reason: format!("invalid URL: {}", peer.url),
            })?;
            Ok(PeerConfig {
                name: peer.name.clone(),
                url,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let tls = if cfg.cluster.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.cluster.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClusterConfig {
        peers,
        tls,
        timeout: Duration::from_secs(cfg.cluster.timeout),
        token: None,
    })
}

/// Build the project feature table from `[projects.*]`.
pub fn to_projects(cfg: &Config) -> StaticProjects {
    let projects = StaticProjects::new();
    for (name, section) in &cfg.projects {
        projects.set_profile_isolation(name.clone(), section.profiles);
    }
    projects
}

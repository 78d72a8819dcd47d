// ── Core error types ──
//
// User-facing errors from profiled-core. Every profile operation fails
// with exactly one of these; none of them is retried inside the core.
// The `From<profiled_api::Error>` impl translates peer transport errors,
// which only ever reach observability channels.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Request errors ───────────────────────────────────────────────
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Profile '{name}' not found in namespace '{namespace}'")]
    NotFound { namespace: String, name: String },

    #[error("Namespace '{namespace}' not found")]
    NamespaceNotFound { namespace: String },

    #[error("Profile '{name}' already exists in namespace '{namespace}'")]
    AlreadyExists { namespace: String, name: String },

    #[error("Name '{name}' already in use in namespace '{namespace}'")]
    Conflict { namespace: String, name: String },

    #[error("Profile '{name}' has changed since it was fetched; re-read it and retry")]
    PreconditionFailed { name: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Profile '{name}' is currently in use by {}", instances.join(", "))]
    InUse { name: String, instances: Vec<String> },

    // ── Backend errors ───────────────────────────────────────────────
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cluster peer error: {message}")]
    Peer {
        message: String,
        /// HTTP status reported by the peer (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(namespace: &str, name: &str) -> Self {
        Self::NotFound {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        }
    }

    /// Returns `true` if the named profile (or its namespace) is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NamespaceNotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<profiled_api::Error> for CoreError {
    fn from(err: profiled_api::Error) -> Self {
        match err {
            profiled_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            profiled_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("URL cannot be used as a node base: {url}"),
            },
            profiled_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            profiled_api::Error::Timeout { timeout_secs } => CoreError::Peer {
                message: format!("timed out after {timeout_secs}s"),
                status: None,
            },
            profiled_api::Error::Remote { status, message } => CoreError::Peer {
                message,
                status: Some(status),
            },
            profiled_api::Error::Transport(ref e) => CoreError::Peer {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            profiled_api::Error::Deserialization { message, body: _ } => CoreError::Peer {
                message: format!("unreadable response: {message}"),
                status: None,
            },
        }
    }
}

// profiled-api: Wire types and async HTTP client for profile cluster notifications

pub mod client;
pub mod error;
pub mod notify;
pub mod transport;
pub mod types;

pub use client::NodeClient;
pub use error::Error;
pub use types::{ProfilePost, ProfilePut, ProfileUpdateNotice, ProfilesPost, Response, ResponseKind};

/// Header marking a request as a cluster-internal notification.
///
/// A node receiving a request carrying this header applies the mutation
/// locally and never forwards it to other members.
pub const NOTIFICATION_HEADER: &str = "X-Profiled-Notification";

/// Header carrying the shared cluster secret, when one is configured.
pub const CLUSTER_TOKEN_HEADER: &str = "X-Profiled-Cluster-Token";

/// API version prefix used in every profile URL.
pub const API_VERSION: &str = "1.0";

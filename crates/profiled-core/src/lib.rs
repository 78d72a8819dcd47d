// profiled-core: Profile mutation protocol between transports and the node-local store.

pub mod cluster;
pub mod config;
pub mod convert;
pub mod error;
pub mod fingerprint;
pub mod instances;
pub mod integrity;
pub mod merge;
pub mod model;
pub mod namespace;
pub mod service;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cluster::{
    ClusterMembership, ClusterNode, PropagationReport, Propagator, RemoteNode, StaticMembership,
};
pub use config::{ClusterConfig, PeerConfig, ServiceConfig, TlsVerification};
pub use error::CoreError;
pub use fingerprint::{Fingerprint, check_precondition};
pub use instances::{InstanceIndex, MemoryInstanceIndex};
pub use integrity::IntegrityGuard;
pub use merge::ProfilePatch;
pub use namespace::{NamespaceResolver, ProjectFeatures, StaticProjects};
pub use service::{Collaborators, ProfileListing, ProfileService, ProfileSnapshot};
pub use store::{MemoryStore, ProfileStore};
pub use validate::{ContentValidator, StandardValidator, validate_profile_name};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ConfigMap, DEFAULT_NAMESPACE, DEFAULT_PROFILE, DeviceMap, NewProfile, Profile, ProfileFields,
    ProfileId, ProfileMutation, profile_uri,
};

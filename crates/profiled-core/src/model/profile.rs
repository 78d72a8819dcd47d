use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use profiled_api::API_VERSION;

/// Namespace every non-isolated project resolves to.
pub const DEFAULT_NAMESPACE: &str = "default";

/// The per-namespace profile that can never be renamed or deleted.
pub const DEFAULT_PROFILE: &str = "default";

/// Config key -> value. Ordered so equality and hashing ignore insertion order.
pub type ConfigMap = BTreeMap<String, String>;

/// Device name -> attribute -> value.
pub type DeviceMap = BTreeMap<String, BTreeMap<String, String>>;

/// Store-assigned identifier returned by create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three mutable fields of a profile.
///
/// Any change to one of them changes the profile's fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: ConfigMap,
    #[serde(default)]
    pub devices: DeviceMap,
}

/// A named, reusable configuration bundle scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub namespace: String,
    pub name: String,
    #[serde(flatten)]
    pub fields: ProfileFields,
}

impl Profile {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, fields: ProfileFields) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            fields,
        }
    }

    /// The profile's URI, e.g. `/1.0/profiles/web?project=team-a`.
    pub fn uri(&self) -> String {
        profile_uri(&self.namespace, &self.name)
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_PROFILE
    }
}

/// A create request: name plus initial fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub name: String,
    #[serde(flatten)]
    pub fields: ProfileFields,
}

/// Build the URI for a profile. The project query is omitted for the
/// default namespace.
pub fn profile_uri(namespace: &str, name: &str) -> String {
    if namespace == DEFAULT_NAMESPACE {
        format!("/{API_VERSION}/profiles/{name}")
    } else {
        format!("/{API_VERSION}/profiles/{name}?project={namespace}")
    }
}

// Wire types for profile documents and the response envelope.
//
// Maps are `BTreeMap` so serialization order is stable regardless of
// how the document was built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Device definitions: device name -> attribute -> value.
pub type DeviceMap = BTreeMap<String, BTreeMap<String, String>>;

/// The mutable part of a profile, as sent by full-replace requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePut {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub devices: DeviceMap,
}

/// Body of a create request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilesPost {
    pub name: String,
    #[serde(flatten)]
    pub profile: ProfilePut,
}

/// Body of a rename request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePost {
    pub name: String,
}

/// Body of a cluster update notification.
///
/// `prior` is the profile as the origin node saw it before writing;
/// receivers compare it against their own copy before applying `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdateNotice {
    pub prior: ProfilePut,
    pub fields: ProfilePut,
}

/// Envelope discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Sync,
    Error,
}

/// `{ type, status_code, error_code, error, metadata }` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response<T> {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub error_code: u16,
    #[serde(default)]
    pub error: String,
    pub metadata: Option<T>,
}

impl<T> Response<T> {
    /// A successful envelope wrapping `metadata`.
    pub fn sync(metadata: Option<T>) -> Self {
        Self {
            kind: ResponseKind::Sync,
            status_code: 200,
            error_code: 0,
            error: String::new(),
            metadata,
        }
    }

    /// An error envelope with the given HTTP-style code.
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Error,
            status_code: 0,
            error_code: code,
            error: message.into(),
            metadata: None,
        }
    }
}

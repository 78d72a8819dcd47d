// ── Concurrency guard ──
//
// A fingerprint (ETag) is the SHA-256 of a profile's mutable fields in a
// canonical, length-prefixed encoding. Maps are walked in key order, so
// the value is independent of how the maps were built.
//
// Checking a fingerprint is a plain read-then-compare that happens before
// the store write. Two writers on the same node can both pass the check
// against the same fingerprint before either writes; the second write
// then wins silently. This is accepted for profile objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::model::ProfileFields;

/// Opaque change token derived from `(config, description, devices)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a profile's mutable fields.
    pub fn compute(fields: &ProfileFields) -> Self {
        let mut hasher = Sha256::new();

        hasher.update(b"config");
        write_len(&mut hasher, fields.config.len());
        for (key, value) in &fields.config {
            write_str(&mut hasher, key);
            write_str(&mut hasher, value);
        }

        hasher.update(b"description");
        write_str(&mut hasher, &fields.description);

        hasher.update(b"devices");
        write_len(&mut hasher, fields.devices.len());
        for (device, attrs) in &fields.devices {
            write_str(&mut hasher, device);
            write_len(&mut hasher, attrs.len());
            for (key, value) in attrs {
                write_str(&mut hasher, key);
                write_str(&mut hasher, value);
            }
        }

        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn write_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_be_bytes());
}

fn write_str(hasher: &mut Sha256, s: &str) {
    write_len(hasher, s.len());
    hasher.update(s.as_bytes());
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = CoreError;

    /// Accepts the bare token or an HTTP-style quoted ETag (`"abc"`, `W/"abc"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix("W/").unwrap_or(trimmed);
        let trimmed = trimmed.trim_matches('"');
        if trimmed.is_empty() {
            return Err(CoreError::bad_request("Empty concurrency token"));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Compare a caller-supplied token against the current fingerprint.
///
/// An absent token imposes no precondition.
pub fn check_precondition(
    name: &str,
    supplied: Option<&Fingerprint>,
    current: &Fingerprint,
) -> Result<(), CoreError> {
    match supplied {
        Some(token) if token != current => Err(CoreError::PreconditionFailed {
            name: name.to_owned(),
        }),
        _ => Ok(()),
    }
}

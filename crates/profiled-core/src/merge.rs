// ── Partial-update merge ──
//
// A patch document is decoded twice: once as an untyped JSON object to
// learn which top-level keys were sent, once as the typed wire document.
// Presence decides between "keep the previous value" and "use what was
// sent", which the typed decode alone cannot tell apart for `description`.

use std::collections::BTreeMap;

use serde_json::Value;

use profiled_api::ProfilePut;

use crate::error::CoreError;
use crate::model::{ConfigMap, DeviceMap, ProfileFields};

/// A partial update. `None` means the field was omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub description: Option<String>,
    pub config: Option<ConfigMap>,
    pub devices: Option<DeviceMap>,
}

impl ProfilePatch {
    /// Decode a raw patch body.
    ///
    /// A key that is missing or `null` counts as omitted. `description`
    /// additionally counts as omitted unless it is a string.
    pub fn from_json(raw: &Value) -> Result<Self, CoreError> {
        let Value::Object(map) = raw else {
            return Err(CoreError::bad_request("Patch body must be a JSON object"));
        };

        let typed: ProfilePut = serde_json::from_value(strip_nulls(map))
            .map_err(|e| CoreError::bad_request(format!("Invalid patch document: {e}")))?;

        let present = |key: &str| map.get(key).is_some_and(|v| !v.is_null());

        Ok(Self {
            description: map
                .get("description")
                .and_then(Value::as_str)
                .map(|_| typed.description),
            config: present("config").then_some(typed.config),
            devices: present("devices").then_some(typed.devices),
        })
    }

    /// Parse a raw patch body from bytes.
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        let raw: Value = serde_json::from_slice(body)
            .map_err(|e| CoreError::bad_request(format!("Invalid JSON: {e}")))?;
        Self::from_json(&raw)
    }

    /// Produce the full document a replace would receive.
    ///
    /// - `description`: previous value unless supplied (an empty string
    ///   counts as supplied).
    /// - `config` / `devices`: previous map when omitted; an explicitly
    ///   empty map clears it; otherwise supplied keys win and keys only
    ///   present before survive. A key can never be removed by a patch
    ///   that also supplies other keys.
    pub fn apply(self, previous: &ProfileFields) -> ProfileFields {
        ProfileFields {
            description: self
                .description
                .unwrap_or_else(|| previous.description.clone()),
            config: merge_keys(self.config, &previous.config),
            devices: merge_keys(self.devices, &previous.devices),
        }
    }
}

fn merge_keys<V: Clone>(
    supplied: Option<BTreeMap<String, V>>,
    previous: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    match supplied {
        None => previous.clone(),
        Some(map) if map.is_empty() => map,
        Some(mut map) => {
            for (key, value) in previous {
                map.entry(key.clone()).or_insert_with(|| value.clone());
            }
            map
        }
    }
}

/// Drop `null` members so the typed decode falls back to defaults.
fn strip_nulls(map: &serde_json::Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

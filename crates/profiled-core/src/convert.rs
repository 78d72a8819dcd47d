// ── API-to-domain type conversions ──
//
// Bridges wire documents from `profiled-api` into canonical domain
// types and back. The shapes are identical today; keeping the
// conversion explicit lets either side grow fields independently.
//
// The receiving half of the notification protocol lives here too: a
// transport hands over method, profile path segment and body, and gets
// back the `ProfileMutation` to feed into `apply_notification`.

use serde::de::DeserializeOwned;

use profiled_api::{ProfilePost, ProfilePut, ProfileUpdateNotice, ProfilesPost};

use crate::error::CoreError;
use crate::model::{NewProfile, ProfileFields, ProfileMutation};

impl From<ProfilePut> for ProfileFields {
    fn from(put: ProfilePut) -> Self {
        Self {
            description: put.description,
            config: put.config,
            devices: put.devices,
        }
    }
}

impl From<ProfileFields> for ProfilePut {
    fn from(fields: ProfileFields) -> Self {
        Self {
            description: fields.description,
            config: fields.config,
            devices: fields.devices,
        }
    }
}

impl From<&ProfileFields> for ProfilePut {
    fn from(fields: &ProfileFields) -> Self {
        Self::from(fields.clone())
    }
}

impl From<ProfilesPost> for NewProfile {
    fn from(post: ProfilesPost) -> Self {
        Self {
            name: post.name,
            fields: post.profile.into(),
        }
    }
}

impl From<&NewProfile> for ProfilesPost {
    fn from(new: &NewProfile) -> Self {
        Self {
            name: new.name.clone(),
            profile: ProfilePut::from(&new.fields),
        }
    }
}

// ── Received notifications ──────────────────────────────────────────

impl ProfileMutation {
    /// `PUT /1.0/profiles/{name}` with `{ prior, fields }`.
    pub fn from_update_notice(name: impl Into<String>, notice: ProfileUpdateNotice) -> Self {
        Self::Update {
            name: name.into(),
            prior: notice.prior.into(),
            fields: notice.fields.into(),
        }
    }

    /// `POST /1.0/profiles` with a create body.
    pub fn from_create_post(post: ProfilesPost) -> Self {
        let new = NewProfile::from(post);
        Self::Create {
            name: new.name,
            fields: new.fields,
        }
    }

    /// `POST /1.0/profiles/{name}` with `{ "name": new_name }`.
    pub fn from_rename_post(name: impl Into<String>, post: ProfilePost) -> Self {
        Self::Rename {
            name: name.into(),
            new_name: post.name,
        }
    }

    /// `DELETE /1.0/profiles/{name}`.
    pub fn delete(name: impl Into<String>) -> Self {
        Self::Delete { name: name.into() }
    }

    /// Decode a received notification request.
    ///
    /// `name` is the profile path segment, `None` for the collection URL.
    pub fn from_notification(
        method: &str,
        name: Option<&str>,
        body: &[u8],
    ) -> Result<Self, CoreError> {
        match (method.to_ascii_uppercase().as_str(), name) {
            ("PUT", Some(name)) => Ok(Self::from_update_notice(name, decode(body)?)),
            ("POST", None) => Ok(Self::from_create_post(decode(body)?)),
            ("POST", Some(name)) => Ok(Self::from_rename_post(name, decode(body)?)),
            ("DELETE", Some(name)) => Ok(Self::delete(name)),
            _ => Err(CoreError::bad_request(format!(
                "Unsupported notification: {method} {}",
                name.unwrap_or("(collection)")
            ))),
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, CoreError> {
    serde_json::from_slice(body)
        .map_err(|e| CoreError::bad_request(format!("Invalid notification body: {e}")))
}

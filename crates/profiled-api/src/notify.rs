// Cluster notification endpoints
//
// One method per profile mutation kind. Each mirrors the client-facing
// endpoint for the same operation; the notification header installed by
// the transport tells the receiver not to forward it again.

use reqwest::Method;
use tracing::debug;

use crate::client::NodeClient;
use crate::error::Error;
use crate::types::{ProfilePost, ProfilePut, ProfileUpdateNotice, ProfilesPost};

impl NodeClient {
    /// Ask the peer to apply an already-validated update.
    ///
    /// `PUT /1.0/profiles/{name}?project={project}` with `{ prior, fields }`
    pub async fn notify_update(
        &self,
        project: &str,
        name: &str,
        prior: &ProfilePut,
        fields: &ProfilePut,
    ) -> Result<(), Error> {
        let url = self.profiles_url(Some(name), project)?;
        debug!(project, name, "notifying profile update");
        let notice = ProfileUpdateNotice {
            prior: prior.clone(),
            fields: fields.clone(),
        };
        let _: Option<serde_json::Value> = self.send_json(Method::PUT, url, &notice).await?;
        Ok(())
    }

    /// Ask the peer to insert a profile created on the origin node.
    ///
    /// `POST /1.0/profiles?project={project}`
    pub async fn notify_create(&self, project: &str, profile: &ProfilesPost) -> Result<(), Error> {
        let url = self.profiles_url(None, project)?;
        debug!(project, name = %profile.name, "notifying profile create");
        let _: Option<serde_json::Value> = self.send_json(Method::POST, url, profile).await?;
        Ok(())
    }

    /// Ask the peer to rename a profile. Only the name travels.
    ///
    /// `POST /1.0/profiles/{name}?project={project}` with `{ "name": new_name }`
    pub async fn notify_rename(
        &self,
        project: &str,
        name: &str,
        new_name: &str,
    ) -> Result<(), Error> {
        let url = self.profiles_url(Some(name), project)?;
        debug!(project, name, new_name, "notifying profile rename");
        let body = ProfilePost {
            name: new_name.to_owned(),
        };
        let _: Option<serde_json::Value> = self.send_json(Method::POST, url, &body).await?;
        Ok(())
    }

    /// Ask the peer to drop a profile.
    ///
    /// `DELETE /1.0/profiles/{name}?project={project}`
    pub async fn notify_delete(&self, project: &str, name: &str) -> Result<(), Error> {
        let url = self.profiles_url(Some(name), project)?;
        debug!(project, name, "notifying profile delete");
        let _: Option<serde_json::Value> = self.send_empty(Method::DELETE, url).await?;
        Ok(())
    }
}

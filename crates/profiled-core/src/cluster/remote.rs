// Cluster member reached over HTTP through `profiled_api::NodeClient`.

use async_trait::async_trait;
use profiled_api::transport::{TlsMode, TransportConfig};
use profiled_api::{NodeClient, ProfilePut, ProfilesPost};

use super::ClusterNode;
use crate::config::{ClusterConfig, PeerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{NewProfile, ProfileMutation};

pub struct RemoteNode {
    name: String,
    client: NodeClient,
}

impl RemoteNode {
    pub fn new(peer: &PeerConfig, cluster: &ClusterConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_mode(&cluster.tls),
            timeout: cluster.timeout,
            cluster_token: cluster.token.clone(),
        };
        let client = NodeClient::new(peer.url.clone(), &transport)?;
        Ok(Self::with_client(peer.name.clone(), client))
    }

    /// Wrap an existing client (tests point this at a mock server).
    pub fn with_client(name: impl Into<String>, client: NodeClient) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[async_trait]
impl ClusterNode for RemoteNode {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply_profile_mutation(
        &self,
        namespace: &str,
        mutation: &ProfileMutation,
    ) -> Result<(), CoreError> {
        match mutation {
            ProfileMutation::Create { name, fields } => {
                let body = ProfilesPost::from(&NewProfile {
                    name: name.clone(),
                    fields: fields.clone(),
                });
                self.client.notify_create(namespace, &body).await?;
            }
            ProfileMutation::Update {
                name,
                prior,
                fields,
            } => {
                self.client
                    .notify_update(
                        namespace,
                        name,
                        &ProfilePut::from(prior),
                        &ProfilePut::from(fields),
                    )
                    .await?;
            }
            ProfileMutation::Rename { name, new_name } => {
                self.client.notify_rename(namespace, name, new_name).await?;
            }
            ProfileMutation::Delete { name } => {
                self.client.notify_delete(namespace, name).await?;
            }
        }
        Ok(())
    }
}

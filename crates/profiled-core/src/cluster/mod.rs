// ── Cluster propagation ──
//
// After a local write commits, the same mutation is fanned out to every
// other live member. Delivery is best-effort: failures are logged and
// never reach the caller whose write already succeeded.

mod propagator;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ClusterConfig;
use crate::error::CoreError;
use crate::model::ProfileMutation;

pub use propagator::{PropagationReport, Propagator};
pub use remote::RemoteNode;

/// A cluster member able to apply a committed profile mutation.
#[async_trait]
pub trait ClusterNode: Send + Sync {
    /// Stable member name, used in logs.
    fn name(&self) -> &str;

    /// Apply `mutation` in `namespace` on this member.
    ///
    /// The member must not forward it any further.
    async fn apply_profile_mutation(
        &self,
        namespace: &str,
        mutation: &ProfileMutation,
    ) -> Result<(), CoreError>;
}

/// Cluster membership collaborator.
pub trait ClusterMembership: Send + Sync {
    /// Every other member believed alive. Never includes this node.
    fn alive_nodes(&self) -> Vec<Arc<dyn ClusterNode>>;
}

/// A fixed member list. Every listed member counts as alive; unreachable
/// ones surface as failed deliveries.
#[derive(Default, Clone)]
pub struct StaticMembership {
    nodes: Vec<Arc<dyn ClusterNode>>,
}

impl StaticMembership {
    pub fn new(nodes: Vec<Arc<dyn ClusterNode>>) -> Self {
        Self { nodes }
    }

    /// A single-node cluster: nothing to propagate to.
    pub fn standalone() -> Self {
        Self::default()
    }

    /// Build one [`RemoteNode`] per configured peer.
    pub fn from_config(config: &ClusterConfig) -> Result<Self, CoreError> {
        let nodes = config
            .peers
            .iter()
            .map(|peer| RemoteNode::new(peer, config).map(|n| Arc::new(n) as Arc<dyn ClusterNode>))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ClusterMembership for StaticMembership {
    fn alive_nodes(&self) -> Vec<Arc<dyn ClusterNode>> {
        self.nodes.clone()
    }
}

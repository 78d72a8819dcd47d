use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use super::{ClusterMembership, ClusterNode};
use crate::error::CoreError;
use crate::model::ProfileMutation;

/// Outcome of one fan-out. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Members that acknowledged the mutation.
    pub delivered: Vec<String>,
    /// Members that failed or timed out, with the reason.
    pub failed: Vec<(String, String)>,
}

impl PropagationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fans committed mutations out to the other cluster members.
///
/// All members are contacted concurrently, each bounded by `timeout`, so
/// the slowest member delays the caller by at most one timeout.
#[derive(Clone)]
pub struct Propagator {
    membership: Arc<dyn ClusterMembership>,
    timeout: Duration,
}

impl Propagator {
    pub fn new(membership: Arc<dyn ClusterMembership>, timeout: Duration) -> Self {
        Self {
            membership,
            timeout,
        }
    }

    pub async fn propagate(&self, namespace: &str, mutation: &ProfileMutation) -> PropagationReport {
        let nodes = self.membership.alive_nodes();
        if nodes.is_empty() {
            return PropagationReport::default();
        }

        debug!(
            namespace,
            profile = mutation.name(),
            kind = mutation.kind(),
            members = nodes.len(),
            "propagating profile mutation"
        );

        let results = join_all(
            nodes
                .iter()
                .map(|node| self.deliver(Arc::clone(node), namespace, mutation)),
        )
        .await;

        let mut report = PropagationReport::default();
        for (node, result) in nodes.iter().zip(results) {
            match result {
                Ok(()) => report.delivered.push(node.name().to_owned()),
                Err(e) => {
                    warn!(
                        node = node.name(),
                        namespace,
                        profile = mutation.name(),
                        kind = mutation.kind(),
                        error = %e,
                        "failed to notify cluster member"
                    );
                    report.failed.push((node.name().to_owned(), e.to_string()));
                }
            }
        }
        report
    }

    async fn deliver(
        &self,
        node: Arc<dyn ClusterNode>,
        namespace: &str,
        mutation: &ProfileMutation,
    ) -> Result<(), CoreError> {
        match tokio::time::timeout(self.timeout, node.apply_profile_mutation(namespace, mutation))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CoreError::Peer {
                message: format!("no response within {:?}", self.timeout),
                status: None,
            }),
        }
    }
}

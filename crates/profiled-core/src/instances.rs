// ── Instance index ──
//
// Which instances reference which profiles, by name. Rename and delete
// consult it.

use std::collections::{BTreeMap, BTreeSet};

use dashmap::DashMap;

use crate::error::CoreError;

/// Instance index collaborator.
pub trait InstanceIndex: Send + Sync {
    /// Instances in `namespace` whose profile list includes `name`, sorted.
    fn instances_referencing_profile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<String>, CoreError>;
}

/// In-memory index: namespace -> instance -> attached profiles.
#[derive(Debug, Default)]
pub struct MemoryInstanceIndex {
    by_namespace: DashMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl MemoryInstanceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `profile` to `instance`. Returns `false` if already attached.
    pub fn attach(&self, namespace: &str, instance: &str, profile: &str) -> bool {
        self.by_namespace
            .entry(namespace.to_owned())
            .or_default()
            .entry(instance.to_owned())
            .or_default()
            .insert(profile.to_owned())
    }

    /// Detach `profile` from `instance`. Returns `false` if it wasn't attached.
    pub fn detach(&self, namespace: &str, instance: &str, profile: &str) -> bool {
        let Some(mut instances) = self.by_namespace.get_mut(namespace) else {
            return false;
        };
        let Some(profiles) = instances.get_mut(instance) else {
            return false;
        };
        let removed = profiles.remove(profile);
        if profiles.is_empty() {
            instances.remove(instance);
        }
        removed
    }
}

impl InstanceIndex for MemoryInstanceIndex {
    fn instances_referencing_profile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<String>, CoreError> {
        Ok(self
            .by_namespace
            .get(namespace)
            .map(|instances| {
                instances
                    .iter()
                    .filter(|(_, profiles)| profiles.contains(name))
                    .map(|(instance, _)| instance.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

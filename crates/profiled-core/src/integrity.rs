// ── Integrity guard ──
//
// Checks that run before rename and delete. The store knows nothing of
// the default profile, so that rule lives here and is applied on every
// call. Instances reference profiles by name, so a referenced profile can
// be neither deleted nor renamed. The reference scan is not held against
// instances attaching the profile concurrently.

use std::sync::Arc;

use crate::error::CoreError;
use crate::instances::InstanceIndex;
use crate::model::DEFAULT_PROFILE;
use crate::store::ProfileStore;

pub struct IntegrityGuard {
    instances: Arc<dyn InstanceIndex>,
}

impl IntegrityGuard {
    pub fn new(instances: Arc<dyn InstanceIndex>) -> Self {
        Self { instances }
    }

    /// `Forbidden` for the default profile, in every namespace.
    pub fn ensure_not_default(name: &str, action: &str) -> Result<(), CoreError> {
        if name == DEFAULT_PROFILE {
            return Err(CoreError::Forbidden {
                message: format!("The \"{DEFAULT_PROFILE}\" profile cannot be {action}"),
            });
        }
        Ok(())
    }

    /// Delete is refused while any instance in the namespace references the profile.
    pub fn check_delete(&self, namespace: &str, name: &str) -> Result<(), CoreError> {
        Self::ensure_not_default(name, "deleted")?;
        self.ensure_unreferenced(namespace, name)
    }

    /// Rename is refused onto an existing name, and while any instance
    /// still references the profile under its current name.
    pub fn check_rename(
        &self,
        store: &dyn ProfileStore,
        namespace: &str,
        name: &str,
        new_name: &str,
    ) -> Result<(), CoreError> {
        Self::ensure_not_default(name, "renamed")?;
        if store.exists(namespace, new_name)? {
            return Err(CoreError::Conflict {
                namespace: namespace.to_owned(),
                name: new_name.to_owned(),
            });
        }
        self.ensure_unreferenced(namespace, name)
    }

    fn ensure_unreferenced(&self, namespace: &str, name: &str) -> Result<(), CoreError> {
        let instances = self
            .instances
            .instances_referencing_profile(namespace, name)?;
        if instances.is_empty() {
            return Ok(());
        }
        Err(CoreError::InUse {
            name: name.to_owned(),
            instances,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::instances::MemoryInstanceIndex;
    use crate::model::{Profile, ProfileFields};
    use crate::store::MemoryStore;

    fn unreferenced() -> IntegrityGuard {
        IntegrityGuard::new(Arc::new(MemoryInstanceIndex::new()))
    }

    #[test]
    fn default_profile_is_protected() {
        let guard = unreferenced();
        let store = MemoryStore::new();

        assert!(matches!(
            guard.check_delete("team-a", "default"),
            Err(CoreError::Forbidden { .. })
        ));
        assert!(matches!(
            guard.check_rename(&store, "default", "default", "other"),
            Err(CoreError::Forbidden { .. })
        ));
    }

    #[test]
    fn referenced_profile_is_in_use() {
        let index = Arc::new(MemoryInstanceIndex::new());
        index.attach("default", "c1", "web");
        let guard = IntegrityGuard::new(Arc::clone(&index) as Arc<dyn InstanceIndex>);

        match guard.check_delete("default", "web") {
            Err(CoreError::InUse { instances, .. }) => assert_eq!(instances, vec!["c1"]),
            other => panic!("expected InUse, got {other:?}"),
        }
        // Same name in another namespace is unaffected.
        assert!(guard.check_delete("team-a", "web").is_ok());

        index.detach("default", "c1", "web");
        assert!(guard.check_delete("default", "web").is_ok());
    }

    #[test]
    fn rename_onto_taken_name_conflicts() {
        let guard = unreferenced();
        let store = MemoryStore::new();
        store
            .create(&Profile::new("default", "db", ProfileFields::default()))
            .unwrap();

        assert!(matches!(
            guard.check_rename(&store, "default", "web", "db"),
            Err(CoreError::Conflict { .. })
        ));
        assert!(guard.check_rename(&store, "default", "web", "cache").is_ok());
    }

    #[test]
    fn referenced_profile_cannot_be_renamed() {
        let index = Arc::new(MemoryInstanceIndex::new());
        index.attach("default", "c1", "web");
        let guard = IntegrityGuard::new(Arc::clone(&index) as Arc<dyn InstanceIndex>);
        let store = MemoryStore::new();

        match guard.check_rename(&store, "default", "web", "frontend") {
            Err(CoreError::InUse { instances, .. }) => assert_eq!(instances, vec!["c1"]),
            other => panic!("expected InUse, got {other:?}"),
        }

        index.detach("default", "c1", "web");
        assert!(guard.check_rename(&store, "default", "web", "frontend").is_ok());
    }
}

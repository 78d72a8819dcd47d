// ── In-memory profile store ──
//
// One `DashMap` shard entry per namespace; each call holds that entry's
// lock for its whole duration, so readers never see a half-applied write.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::ProfileStore;
use crate::error::CoreError;
use crate::model::{DEFAULT_NAMESPACE, DEFAULT_PROFILE, Profile, ProfileFields, ProfileId};

#[derive(Debug, Clone)]
struct StoredProfile {
    id: ProfileId,
    fields: ProfileFields,
}

/// Lock-free, namespace-sharded profile storage.
#[derive(Debug)]
pub struct MemoryStore {
    namespaces: DashMap<String, BTreeMap<String, StoredProfile>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding only the default namespace's `default` profile.
    pub fn new() -> Self {
        let store = Self {
            namespaces: DashMap::new(),
            next_id: AtomicU64::new(1),
        };
        store.ensure_namespace(DEFAULT_NAMESPACE);
        store
    }

    /// Make `namespace` known and seed its `default` profile if missing.
    pub fn ensure_namespace(&self, namespace: &str) {
        let mut profiles = self.namespaces.entry(namespace.to_owned()).or_default();
        if !profiles.contains_key(DEFAULT_PROFILE) {
            let id = self.allocate_id();
            profiles.insert(
                DEFAULT_PROFILE.to_owned(),
                StoredProfile {
                    id,
                    fields: ProfileFields {
                        description: format!("Default profile for namespace {namespace}"),
                        ..ProfileFields::default()
                    },
                },
            );
        }
    }

    /// Store identifier of a profile, stable across renames.
    pub fn id_of(&self, namespace: &str, name: &str) -> Option<ProfileId> {
        self.namespaces
            .get(namespace)
            .and_then(|profiles| profiles.get(name).map(|stored| stored.id))
    }

    /// Total number of profiles across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate_id(&self) -> ProfileId {
        ProfileId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl ProfileStore for MemoryStore {
    fn list(&self, namespace: &str) -> Result<Vec<Profile>, CoreError> {
        Ok(self
            .namespaces
            .get(namespace)
            .map(|profiles| {
                profiles
                    .iter()
                    .map(|(name, stored)| Profile::new(namespace, name.clone(), stored.fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, namespace: &str, name: &str) -> Result<Profile, CoreError> {
        self.namespaces
            .get(namespace)
            .and_then(|profiles| {
                profiles
                    .get(name)
                    .map(|stored| Profile::new(namespace, name, stored.fields.clone()))
            })
            .ok_or_else(|| CoreError::not_found(namespace, name))
    }

    fn create(&self, profile: &Profile) -> Result<ProfileId, CoreError> {
        let mut profiles = self
            .namespaces
            .entry(profile.namespace.clone())
            .or_default();
        if profiles.contains_key(&profile.name) {
            return Err(CoreError::AlreadyExists {
                namespace: profile.namespace.clone(),
                name: profile.name.clone(),
            });
        }
        let id = self.allocate_id();
        profiles.insert(
            profile.name.clone(),
            StoredProfile {
                id,
                fields: profile.fields.clone(),
            },
        );
        Ok(id)
    }

    fn rename(&self, namespace: &str, name: &str, new_name: &str) -> Result<(), CoreError> {
        let mut profiles = self
            .namespaces
            .get_mut(namespace)
            .ok_or_else(|| CoreError::not_found(namespace, name))?;
        if !profiles.contains_key(name) {
            return Err(CoreError::not_found(namespace, name));
        }
        if profiles.contains_key(new_name) {
            return Err(CoreError::Conflict {
                namespace: namespace.to_owned(),
                name: new_name.to_owned(),
            });
        }
        if let Some(stored) = profiles.remove(name) {
            profiles.insert(new_name.to_owned(), stored);
        }
        Ok(())
    }

    fn delete(&self, namespace: &str, name: &str) -> Result<(), CoreError> {
        self.namespaces
            .get_mut(namespace)
            .and_then(|mut profiles| profiles.remove(name))
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found(namespace, name))
    }

    fn replace(
        &self,
        namespace: &str,
        name: &str,
        fields: &ProfileFields,
    ) -> Result<(), CoreError> {
        let mut profiles = self
            .namespaces
            .get_mut(namespace)
            .ok_or_else(|| CoreError::not_found(namespace, name))?;
        let stored = profiles
            .get_mut(name)
            .ok_or_else(|| CoreError::not_found(namespace, name))?;
        stored.fields = fields.clone();
        Ok(())
    }
}

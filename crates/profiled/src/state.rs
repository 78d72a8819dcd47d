//! Node-local JSON state file.
//!
//! Holds every profile and the instance -> profile attachments. Each
//! mutation is applied to a copy of the document, written to a temporary
//! file and renamed over the original while the in-process lock is held;
//! the in-memory copy is swapped only after the rename succeeds.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use profiled_core::{
    CoreError, DEFAULT_PROFILE, InstanceIndex, Profile, ProfileFields, ProfileId, ProfileStore,
};

/// On-disk document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StateDoc {
    /// namespace -> name -> profile
    #[serde(default)]
    profiles: BTreeMap<String, BTreeMap<String, Profile>>,

    /// namespace -> instance -> attached profile names
    #[serde(default)]
    instances: BTreeMap<String, BTreeMap<String, Vec<String>>>,

    /// Last identifier handed out by create.
    #[serde(default)]
    last_id: u64,
}

impl StateDoc {
    fn seed_default(&mut self, namespace: &str) -> bool {
        let profiles = self.profiles.entry(namespace.to_owned()).or_default();
        if profiles.contains_key(DEFAULT_PROFILE) {
            return false;
        }
        profiles.insert(
            DEFAULT_PROFILE.to_owned(),
            Profile::new(
                namespace,
                DEFAULT_PROFILE,
                ProfileFields {
                    description: format!("Default profile for namespace {namespace}"),
                    ..ProfileFields::default()
                },
            ),
        );
        true
    }
}

/// Profile store and instance index backed by one JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    doc: Mutex<StateDoc>,
}

impl FileStore {
    /// Open (or start) the state file, seeding `default` in each namespace.
    pub fn open(path: &Path, namespaces: &[String]) -> Result<Self, CoreError> {
        let mut doc = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| storage(path, &e))?;
            serde_json::from_str::<StateDoc>(&raw).map_err(|e| storage(path, &e))?
        } else {
            StateDoc::default()
        };

        for namespace in namespaces {
            if doc.seed_default(namespace) {
                debug!(namespace = %namespace, "seeded default profile");
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            doc: Mutex::new(doc),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, StateDoc>, CoreError> {
        self.doc.lock().map_err(|_| CoreError::Storage {
            message: "state lock poisoned".into(),
        })
    }

    /// Apply `change` to a copy of the document and persist it.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StateDoc) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    fn persist(&self, doc: &StateDoc) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| storage(&self.path, &e))?;
            }
        }
        let body = serde_json::to_vec_pretty(doc).map_err(|e| storage(&self.path, &e))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| storage(&tmp, &e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| storage(&self.path, &e))?;
        debug!(path = %self.path.display(), "state written");
        Ok(())
    }
}

fn storage(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::Storage {
        message: format!("{}: {err}", path.display()),
    }
}

fn not_found(namespace: &str, name: &str) -> CoreError {
    CoreError::NotFound {
        namespace: namespace.to_owned(),
        name: name.to_owned(),
    }
}

impl ProfileStore for FileStore {
    fn list(&self, namespace: &str) -> Result<Vec<Profile>, CoreError> {
        let doc = self.lock()?;
        Ok(doc
            .profiles
            .get(namespace)
            .map(|profiles| profiles.values().cloned().collect())
            .unwrap_or_default())
    }

    fn get(&self, namespace: &str, name: &str) -> Result<Profile, CoreError> {
        let doc = self.lock()?;
        doc.profiles
            .get(namespace)
            .and_then(|profiles| profiles.get(name))
            .cloned()
            .ok_or_else(|| not_found(namespace, name))
    }

    fn create(&self, profile: &Profile) -> Result<ProfileId, CoreError> {
        self.mutate(|doc| {
            let profiles = doc.profiles.entry(profile.namespace.clone()).or_default();
            if profiles.contains_key(&profile.name) {
                return Err(CoreError::AlreadyExists {
                    namespace: profile.namespace.clone(),
                    name: profile.name.clone(),
                });
            }
            profiles.insert(profile.name.clone(), profile.clone());
            doc.last_id += 1;
            Ok(ProfileId(doc.last_id))
        })
    }

    fn rename(&self, namespace: &str, name: &str, new_name: &str) -> Result<(), CoreError> {
        self.mutate(|doc| {
            let profiles = doc
                .profiles
                .get_mut(namespace)
                .ok_or_else(|| not_found(namespace, name))?;
            if profiles.contains_key(new_name) {
                return Err(CoreError::Conflict {
                    namespace: namespace.to_owned(),
                    name: new_name.to_owned(),
                });
            }
            let mut profile = profiles
                .remove(name)
                .ok_or_else(|| not_found(namespace, name))?;
            new_name.clone_into(&mut profile.name);
            profiles.insert(new_name.to_owned(), profile);
            Ok(())
        })
    }

    fn delete(&self, namespace: &str, name: &str) -> Result<(), CoreError> {
        self.mutate(|doc| {
            doc.profiles
                .get_mut(namespace)
                .and_then(|profiles| profiles.remove(name))
                .map(|_| ())
                .ok_or_else(|| not_found(namespace, name))
        })
    }

    fn replace(
        &self,
        namespace: &str,
        name: &str,
        fields: &ProfileFields,
    ) -> Result<(), CoreError> {
        self.mutate(|doc| {
            let profile = doc
                .profiles
                .get_mut(namespace)
                .and_then(|profiles| profiles.get_mut(name))
                .ok_or_else(|| not_found(namespace, name))?;
            profile.fields = fields.clone();
            Ok(())
        })
    }
}

impl InstanceIndex for FileStore {
    fn instances_referencing_profile(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Vec<String>, CoreError> {
        let doc = self.lock()?;
        Ok(doc
            .instances
            .get(namespace)
            .map(|instances| {
                instances
                    .iter()
                    .filter(|(_, profiles)| profiles.iter().any(|p| p == name))
                    .map(|(instance, _)| instance.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

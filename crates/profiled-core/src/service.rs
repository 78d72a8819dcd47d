// ── Profile service ──
//
// The boundary every transport calls into. Each operation resolves the
// effective namespace, reads current state, runs the concurrency and
// integrity checks, writes through the store, and finally fans the
// committed mutation out to the rest of the cluster.
//
// Requests that are themselves cluster notifications enter through
// `apply_notification`, which writes locally and never propagates.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::cluster::{ClusterMembership, Propagator};
use crate::config::ServiceConfig;
use crate::error::CoreError;
use crate::fingerprint::{Fingerprint, check_precondition};
use crate::instances::InstanceIndex;
use crate::integrity::IntegrityGuard;
use crate::merge::ProfilePatch;
use crate::model::{NewProfile, Profile, ProfileFields, ProfileMutation, profile_uri};
use crate::namespace::{NamespaceResolver, ProjectFeatures};
use crate::store::ProfileStore;
use crate::validate::{ContentValidator, validate_profile_name};

/// External collaborators a service is wired to.
pub struct Collaborators {
    pub store: Arc<dyn ProfileStore>,
    pub features: Arc<dyn ProjectFeatures>,
    pub validator: Arc<dyn ContentValidator>,
    pub instances: Arc<dyn InstanceIndex>,
    pub membership: Arc<dyn ClusterMembership>,
}

/// A profile together with its current concurrency token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSnapshot {
    #[serde(flatten)]
    pub profile: Profile,
    pub etag: Fingerprint,
}

impl ProfileSnapshot {
    fn of(profile: Profile) -> Self {
        let etag = Fingerprint::compute(&profile.fields);
        Self { profile, etag }
    }
}

/// Result of a list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileListing {
    Uris(Vec<String>),
    Full(Vec<Profile>),
}

impl ProfileListing {
    pub fn len(&self) -> usize {
        match self {
            Self::Uris(uris) => uris.len(),
            Self::Full(profiles) => profiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Namespace-scoped profile operations for one node.
///
/// Cheaply cloneable; clones share the same collaborators.
#[derive(Clone)]
pub struct ProfileService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    config: ServiceConfig,
    store: Arc<dyn ProfileStore>,
    resolver: NamespaceResolver,
    validator: Arc<dyn ContentValidator>,
    integrity: IntegrityGuard,
    propagator: Propagator,
}

impl ProfileService {
    pub fn new(config: ServiceConfig, collaborators: Collaborators) -> Self {
        let resolver =
            NamespaceResolver::new(collaborators.features, config.default_namespace.clone());
        let propagator = Propagator::new(collaborators.membership, config.propagation_timeout);
        Self {
            inner: Arc::new(ServiceInner {
                store: collaborators.store,
                resolver,
                validator: collaborators.validator,
                integrity: IntegrityGuard::new(collaborators.instances),
                propagator,
                config,
            }),
        }
    }

    /// The namespace that `project` currently resolves to.
    pub fn resolve_namespace(&self, project: &str) -> Result<String, CoreError> {
        self.inner.resolver.resolve(project)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Profiles in the effective namespace, ordered by name.
    ///
    /// `recursive` returns full objects; otherwise URIs.
    pub fn list(&self, project: &str, recursive: bool) -> Result<ProfileListing, CoreError> {
        let namespace = self.resolve_namespace(project)?;
        let profiles = self.inner.store.list(&namespace)?;
        Ok(if recursive {
            ProfileListing::Full(profiles)
        } else {
            ProfileListing::Uris(profiles.iter().map(Profile::uri).collect())
        })
    }

    pub fn get(&self, project: &str, name: &str) -> Result<ProfileSnapshot, CoreError> {
        let namespace = self.resolve_namespace(project)?;
        self.inner.store.get(&namespace, name).map(ProfileSnapshot::of)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a profile. Returns its URI.
    pub async fn create(&self, project: &str, new: NewProfile) -> Result<String, CoreError> {
        let namespace = self.resolve_namespace(project)?;
        validate_profile_name(&new.name)?;
        self.validate_content(&new.fields)?;

        let profile = Profile::new(&namespace, new.name, new.fields);
        let id = self.inner.store.create(&profile)?;
        info!(
            node = %self.inner.config.node_name,
            namespace = %namespace,
            profile = %profile.name,
            %id,
            "profile created"
        );

        let uri = profile.uri();
        self.propagate(
            &namespace,
            ProfileMutation::Create {
                name: profile.name,
                fields: profile.fields,
            },
        )
        .await;
        Ok(uri)
    }

    /// Overwrite description, config and devices entirely.
    pub async fn replace(
        &self,
        project: &str,
        name: &str,
        fields: ProfileFields,
        token: Option<&Fingerprint>,
    ) -> Result<ProfileSnapshot, CoreError> {
        let namespace = self.resolve_namespace(project)?;
        let current = self.inner.store.get(&namespace, name)?;
        check_precondition(name, token, &Fingerprint::compute(&current.fields))?;
        self.commit_update(&namespace, current, fields).await
    }

    /// Merge a partial document into the current profile, then write it
    /// the same way [`replace`](Self::replace) does.
    pub async fn patch(
        &self,
        project: &str,
        name: &str,
        patch: ProfilePatch,
        token: Option<&Fingerprint>,
    ) -> Result<ProfileSnapshot, CoreError> {
        let namespace = self.resolve_namespace(project)?;
        let current = self.inner.store.get(&namespace, name)?;
        check_precondition(name, token, &Fingerprint::compute(&current.fields))?;
        let merged = patch.apply(&current.fields);
        self.commit_update(&namespace, current, merged).await
    }

    /// Rename a profile. Returns the URI at the new name.
    pub async fn rename(
        &self,
        project: &str,
        name: &str,
        new_name: &str,
        token: Option<&Fingerprint>,
    ) -> Result<String, CoreError> {
        let namespace = self.resolve_namespace(project)?;
        IntegrityGuard::ensure_not_default(name, "renamed")?;
        validate_profile_name(new_name)?;

        let current = self.inner.store.get(&namespace, name)?;
        check_precondition(name, token, &Fingerprint::compute(&current.fields))?;
        self.inner
            .integrity
            .check_rename(self.inner.store.as_ref(), &namespace, name, new_name)?;

        self.inner.store.rename(&namespace, name, new_name)?;
        info!(
            node = %self.inner.config.node_name,
            namespace = %namespace,
            profile = name,
            new_name,
            "profile renamed"
        );

        self.propagate(
            &namespace,
            ProfileMutation::Rename {
                name: name.to_owned(),
                new_name: new_name.to_owned(),
            },
        )
        .await;
        Ok(profile_uri(&namespace, new_name))
    }

    pub async fn delete(
        &self,
        project: &str,
        name: &str,
        token: Option<&Fingerprint>,
    ) -> Result<(), CoreError> {
        let namespace = self.resolve_namespace(project)?;
        IntegrityGuard::ensure_not_default(name, "deleted")?;

        let current = self.inner.store.get(&namespace, name)?;
        check_precondition(name, token, &Fingerprint::compute(&current.fields))?;
        self.inner.integrity.check_delete(&namespace, name)?;

        self.inner.store.delete(&namespace, name)?;
        info!(
            node = %self.inner.config.node_name,
            namespace = %namespace,
            profile = name,
            "profile deleted"
        );

        self.propagate(
            &namespace,
            ProfileMutation::Delete {
                name: name.to_owned(),
            },
        )
        .await;
        Ok(())
    }

    // ── Cluster notifications ────────────────────────────────────────

    /// Apply a mutation another member already committed.
    ///
    /// Content is trusted, but local state is still checked: an update
    /// only lands if this node's copy matches the origin's prior snapshot.
    /// Replays of an already-applied mutation succeed without writing.
    /// Never propagates.
    pub fn apply_notification(
        &self,
        project: &str,
        mutation: ProfileMutation,
    ) -> Result<(), CoreError> {
        let namespace = self.resolve_namespace(project)?;
        let store = self.inner.store.as_ref();
        let kind = mutation.kind();
        let name = mutation.name().to_owned();

        let applied = match mutation {
            ProfileMutation::Create { name, fields } => match store.get(&namespace, &name) {
                Ok(existing) if existing.fields == fields => false,
                Ok(_) => {
                    return Err(CoreError::AlreadyExists {
                        namespace,
                        name,
                    });
                }
                Err(e) if e.is_not_found() => {
                    validate_profile_name(&name)?;
                    store.create(&Profile::new(&namespace, name, fields))?;
                    true
                }
                Err(e) => return Err(e),
            },
            ProfileMutation::Update {
                name,
                prior,
                fields,
            } => {
                let current = store.get(&namespace, &name)?;
                if current.fields == fields {
                    false
                } else {
                    let expected = Fingerprint::compute(&prior);
                    check_precondition(
                        &name,
                        Some(&expected),
                        &Fingerprint::compute(&current.fields),
                    )?;
                    store.replace(&namespace, &name, &fields)?;
                    true
                }
            }
            ProfileMutation::Rename { name, new_name } => {
                IntegrityGuard::ensure_not_default(&name, "renamed")?;
                let old_exists = store.exists(&namespace, &name)?;
                let new_exists = store.exists(&namespace, &new_name)?;
                match (old_exists, new_exists) {
                    (true, false) => {
                        self.inner
                            .integrity
                            .check_rename(store, &namespace, &name, &new_name)?;
                        store.rename(&namespace, &name, &new_name)?;
                        true
                    }
                    (false, true) => false,
                    (true, true) => {
                        return Err(CoreError::Conflict {
                            namespace,
                            name: new_name,
                        });
                    }
                    (false, false) => return Err(CoreError::not_found(&namespace, &name)),
                }
            }
            ProfileMutation::Delete { name } => {
                IntegrityGuard::ensure_not_default(&name, "deleted")?;
                if store.exists(&namespace, &name)? {
                    store.delete(&namespace, &name)?;
                    true
                } else {
                    false
                }
            }
        };

        if applied {
            info!(
                node = %self.inner.config.node_name,
                namespace = %namespace,
                profile = %name,
                kind,
                "applied cluster notification"
            );
        } else {
            debug!(
                namespace = %namespace,
                profile = %name,
                kind,
                "cluster notification already applied"
            );
        }
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn validate_content(&self, fields: &ProfileFields) -> Result<(), CoreError> {
        self.inner.validator.validate_config(&fields.config)?;
        self.inner.validator.validate_devices(&fields.devices)
    }

    async fn commit_update(
        &self,
        namespace: &str,
        current: Profile,
        fields: ProfileFields,
    ) -> Result<ProfileSnapshot, CoreError> {
        self.validate_content(&fields)?;
        self.inner
            .store
            .replace(namespace, &current.name, &fields)?;
        info!(
            node = %self.inner.config.node_name,
            namespace,
            profile = %current.name,
            "profile updated"
        );

        let updated = Profile::new(namespace, current.name.clone(), fields.clone());
        self.propagate(
            namespace,
            ProfileMutation::Update {
                name: current.name,
                prior: current.fields,
                fields,
            },
        )
        .await;
        Ok(ProfileSnapshot::of(updated))
    }

    async fn propagate(&self, namespace: &str, mutation: ProfileMutation) {
        let report = self.inner.propagator.propagate(namespace, &mutation).await;
        if !report.delivered.is_empty() || !report.failed.is_empty() {
            debug!(
                namespace,
                profile = mutation.name(),
                delivered = report.delivered.len(),
                failed = report.failed.len(),
                "propagation finished"
            );
        }
    }
}

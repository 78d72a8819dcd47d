// ── Profile store adapter ──
//
// Contract over the node-local profile store. Each call is atomic on this
// node; nothing here spans calls or nodes.

mod memory;

pub use memory::MemoryStore;

use crate::error::CoreError;
use crate::model::{Profile, ProfileFields, ProfileId};

/// Node-local, namespace-scoped profile storage.
pub trait ProfileStore: Send + Sync {
    /// All profiles in `namespace`, ordered by name.
    fn list(&self, namespace: &str) -> Result<Vec<Profile>, CoreError>;

    /// Fails with [`CoreError::NotFound`] if absent.
    fn get(&self, namespace: &str, name: &str) -> Result<Profile, CoreError>;

    /// Fails with [`CoreError::AlreadyExists`] if `(namespace, name)` is taken.
    fn create(&self, profile: &Profile) -> Result<ProfileId, CoreError>;

    /// Fails with [`CoreError::NotFound`] or [`CoreError::Conflict`].
    fn rename(&self, namespace: &str, name: &str, new_name: &str) -> Result<(), CoreError>;

    /// Fails with [`CoreError::NotFound`].
    fn delete(&self, namespace: &str, name: &str) -> Result<(), CoreError>;

    /// Overwrite all mutable fields. Fails with [`CoreError::NotFound`].
    fn replace(&self, namespace: &str, name: &str, fields: &ProfileFields)
    -> Result<(), CoreError>;

    fn exists(&self, namespace: &str, name: &str) -> Result<bool, CoreError> {
        match self.get(namespace, name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

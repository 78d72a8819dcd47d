// ── Namespace resolution ──
//
// Maps a requested project to the namespace whose profiles it uses.
// Projects without isolated profiles redirect to the default namespace.
// The capability lives outside this crate and may change at any time, so
// every call asks again.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::CoreError;
use crate::model::DEFAULT_NAMESPACE;

/// Project feature query.
pub trait ProjectFeatures: Send + Sync {
    /// Whether `namespace` keeps its own profiles.
    ///
    /// Fails with [`CoreError::NamespaceNotFound`] for unknown projects.
    fn has_profile_isolation(&self, namespace: &str) -> Result<bool, CoreError>;
}

/// In-process project table.
///
/// The default namespace is always known and always isolated.
#[derive(Debug, Default)]
pub struct StaticProjects {
    projects: DashMap<String, bool>,
}

impl StaticProjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project, or flip its profile isolation.
    pub fn set_profile_isolation(&self, namespace: impl Into<String>, isolated: bool) {
        self.projects.insert(namespace.into(), isolated);
    }

    /// Namespaces that keep their own profiles, sorted. Includes the default.
    pub fn isolated_namespaces(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .projects
            .iter()
            .filter(|entry| *entry.value())
            .map(|entry| entry.key().clone())
            .collect();
        if !out.iter().any(|ns| ns == DEFAULT_NAMESPACE) {
            out.push(DEFAULT_NAMESPACE.to_owned());
        }
        out.sort();
        out
    }
}

impl ProjectFeatures for StaticProjects {
    fn has_profile_isolation(&self, namespace: &str) -> Result<bool, CoreError> {
        if namespace == DEFAULT_NAMESPACE {
            return Ok(true);
        }
        self.projects
            .get(namespace)
            .map(|entry| *entry.value())
            .ok_or_else(|| CoreError::NamespaceNotFound {
                namespace: namespace.to_owned(),
            })
    }
}

/// Resolves requested projects to effective profile namespaces.
#[derive(Clone)]
pub struct NamespaceResolver {
    features: Arc<dyn ProjectFeatures>,
    default_namespace: String,
}

impl NamespaceResolver {
    pub fn new(features: Arc<dyn ProjectFeatures>, default_namespace: impl Into<String>) -> Self {
        Self {
            features,
            default_namespace: default_namespace.into(),
        }
    }

    /// Return the namespace all store operations for `requested` must use.
    ///
    /// An empty request means the default namespace.
    pub fn resolve(&self, requested: &str) -> Result<String, CoreError> {
        if requested.is_empty() || requested == self.default_namespace {
            return Ok(self.default_namespace.clone());
        }
        if self.features.has_profile_isolation(requested)? {
            Ok(requested.to_owned())
        } else {
            debug!(
                project = requested,
                namespace = %self.default_namespace,
                "project has no isolated profiles, using default namespace"
            );
            Ok(self.default_namespace.clone())
        }
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolver(projects: &Arc<StaticProjects>) -> NamespaceResolver {
        NamespaceResolver::new(Arc::clone(projects) as Arc<dyn ProjectFeatures>, "default")
    }

    #[test]
    fn isolated_project_keeps_its_namespace() {
        let projects = Arc::new(StaticProjects::new());
        projects.set_profile_isolation("team-a", true);
        assert_eq!(resolver(&projects).resolve("team-a").unwrap(), "team-a");
    }

    #[test]
    fn shared_project_redirects_to_default() {
        let projects = Arc::new(StaticProjects::new());
        projects.set_profile_isolation("team-b", false);
        assert_eq!(resolver(&projects).resolve("team-b").unwrap(), "default");
        assert_eq!(resolver(&projects).resolve("").unwrap(), "default");
    }

    #[test]
    fn capability_is_re_evaluated_each_call() {
        let projects = Arc::new(StaticProjects::new());
        let resolver = resolver(&projects);

        projects.set_profile_isolation("team-c", false);
        assert_eq!(resolver.resolve("team-c").unwrap(), "default");

        projects.set_profile_isolation("team-c", true);
        assert_eq!(resolver.resolve("team-c").unwrap(), "team-c");
    }

    #[test]
    fn unknown_project_is_not_found() {
        let projects = Arc::new(StaticProjects::new());
        let err = resolver(&projects).resolve("ghost").unwrap_err();
        assert!(matches!(err, CoreError::NamespaceNotFound { .. }));
    }

    #[test]
    fn isolated_namespaces_include_default() {
        let projects = StaticProjects::new();
        projects.set_profile_isolation("b", true);
        projects.set_profile_isolation("a", false);
        assert_eq!(projects.isolated_namespaces(), vec!["b", "default"]);
    }
}

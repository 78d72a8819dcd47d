// Integration tests for `ProfileService` with in-memory collaborators.
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use profiled_core::{
    ClusterMembership, ClusterNode, Collaborators, CoreError, Fingerprint, MemoryInstanceIndex, MemoryStore,
    NewProfile, ProfileFields, ProfileListing, ProfileMutation, ProfilePatch, ProfileService,
    ServiceConfig, StandardValidator, StaticMembership, StaticProjects,
};

// ── Fake cluster members ────────────────────────────────────────────

#[derive(Default)]
struct RecordingNode {
    seen: Mutex<Vec<(String, ProfileMutation)>>,
}

#[async_trait]
impl ClusterNode for RecordingNode {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn apply_profile_mutation(
        &self,
        namespace: &str,
        mutation: &ProfileMutation,
    ) -> Result<(), CoreError> {
        self.seen
            .lock()
            .unwrap()
            .push((namespace.to_owned(), mutation.clone()));
        Ok(())
    }
}

struct DeadNode;

#[async_trait]
impl ClusterNode for DeadNode {
    fn name(&self) -> &str {
        "dead"
    }

    async fn apply_profile_mutation(
        &self,
        _namespace: &str,
        _mutation: &ProfileMutation,
    ) -> Result<(), CoreError> {
        Err(CoreError::Peer {
            message: "connection refused".into(),
            status: None,
        })
    }
}

struct HangingNode;

#[async_trait]
impl ClusterNode for HangingNode {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn apply_profile_mutation(
        &self,
        _namespace: &str,
        _mutation: &ProfileMutation,
    ) -> Result<(), CoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// A peer living in the same process: delivers straight into another
/// service's notification entry point.
struct InProcessNode {
    service: ProfileService,
}

#[async_trait]
impl ClusterNode for InProcessNode {
    fn name(&self) -> &str {
        "in-process"
    }

    async fn apply_profile_mutation(
        &self,
        namespace: &str,
        mutation: &ProfileMutation,
    ) -> Result<(), CoreError> {
        self.service.apply_notification(namespace, mutation.clone())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

struct Node {
    service: ProfileService,
    projects: Arc<StaticProjects>,
    store: Arc<MemoryStore>,
    instances: Arc<MemoryInstanceIndex>,
}

fn node_with(peers: Vec<Arc<dyn ClusterNode>>) -> Node {
    node_in(Arc::new(StaticMembership::new(peers)))
}

fn node_in(membership: Arc<dyn ClusterMembership>) -> Node {
    let projects = Arc::new(StaticProjects::new());
    let store = Arc::new(MemoryStore::new());
    let instances = Arc::new(MemoryInstanceIndex::new());
    let config = ServiceConfig {
        propagation_timeout: Duration::from_secs(2),
        ..ServiceConfig::default()
    };
    let service = ProfileService::new(
        config,
        Collaborators {
            store: Arc::clone(&store) as _,
            features: Arc::clone(&projects) as _,
            validator: Arc::new(StandardValidator),
            instances: Arc::clone(&instances) as _,
            membership,
        },
    );
    Node {
        service,
        projects,
        store,
        instances,
    }
}

fn node() -> Node {
    node_with(Vec::new())
}

fn fields(description: &str, config: &[(&str, &str)]) -> ProfileFields {
    ProfileFields {
        description: description.into(),
        config: config
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect(),
        devices: BTreeMap::new(),
    }
}

fn new_profile(name: &str, config: &[(&str, &str)]) -> NewProfile {
    NewProfile {
        name: name.into(),
        fields: fields("", config),
    }
}

fn patch(body: serde_json::Value) -> ProfilePatch {
    ProfilePatch::from_json(&body).unwrap()
}

// ── Scenario ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_patch_then_stale_replace() {
    let Node { service, .. } = node();

    service
        .create("default", new_profile("web", &[("limits.cpu", "2")]))
        .await
        .unwrap();
    let t1 = service.get("default", "web").unwrap().etag;

    let patched = service
        .patch(
            "default",
            "web",
            patch(json!({ "config": { "limits.memory": "512MB" } })),
            Some(&t1),
        )
        .await
        .unwrap();

    let expected: BTreeMap<String, String> = [
        ("limits.cpu".to_owned(), "2".to_owned()),
        ("limits.memory".to_owned(), "512MB".to_owned()),
    ]
    .into();
    assert_eq!(patched.profile.fields.config, expected);
    let t2 = service.get("default", "web").unwrap().etag;
    assert_ne!(t1, t2);
    assert_eq!(patched.etag, t2);

    let err = service
        .replace("default", "web", fields("", &[]), Some(&t1))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PreconditionFailed { .. }));
    assert_eq!(service.get("default", "web").unwrap().etag, t2);
}

// ── Properties ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let Node { service, .. } = node();
    let mut new = new_profile("db", &[("limits.memory", "2GB")]);
    new.fields.description = "database tier".into();
    new.fields.devices.insert(
        "root".into(),
        BTreeMap::from([
            ("type".to_owned(), "disk".to_owned()),
            ("path".to_owned(), "/".to_owned()),
            ("pool".to_owned(), "default".to_owned()),
        ]),
    );

    let uri = service.create("default", new.clone()).await.unwrap();
    assert_eq!(uri, "/1.0/profiles/db");
    assert_eq!(service.get("default", "db").unwrap().profile.fields, new.fields);
}

#[tokio::test]
async fn test_create_rejects_bad_input_and_duplicates() {
    let Node { service, .. } = node();

    for name in ["", "a/b", ".", ".."] {
        let err = service
            .create("default", new_profile(name, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::BadRequest { .. }), "{name:?}");
    }

    let err = service
        .create("default", new_profile("web", &[("bad key", "1")]))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::BadRequest { .. }));

    service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap();
    let err = service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_replace_drops_unsupplied_keys() {
    let Node { service, .. } = node();
    service
        .create("default", new_profile("web", &[("a", "1"), ("b", "2")]))
        .await
        .unwrap();
    let token = service.get("default", "web").unwrap().etag;

    service
        .replace("default", "web", fields("", &[("c", "3")]), Some(&token))
        .await
        .unwrap();

    let config = service.get("default", "web").unwrap().profile.fields.config;
    assert_eq!(config.keys().collect::<Vec<_>>(), vec!["c"]);
}

#[tokio::test]
async fn test_patch_empty_config_differs_from_omitted() {
    let Node { service, .. } = node();
    service
        .create("default", new_profile("web", &[("a", "1")]))
        .await
        .unwrap();

    service
        .patch("default", "web", patch(json!({ "description": "x" })), None)
        .await
        .unwrap();
    let snapshot = service.get("default", "web").unwrap();
    assert_eq!(snapshot.profile.fields.config.len(), 1);
    assert_eq!(snapshot.profile.fields.description, "x");

    service
        .patch("default", "web", patch(json!({ "config": {} })), None)
        .await
        .unwrap();
    let snapshot = service.get("default", "web").unwrap();
    assert!(snapshot.profile.fields.config.is_empty());
    assert_eq!(snapshot.profile.fields.description, "x");
}

#[tokio::test]
async fn test_patch_runs_content_validation() {
    let Node { service, .. } = node();
    service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap();

    let err = service
        .patch(
            "default",
            "web",
            patch(json!({ "devices": { "eth0": { "nictype": "bridged" } } })),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::BadRequest { .. }));
}

#[tokio::test]
async fn test_missing_profile_is_not_found() {
    let Node { service, .. } = node();
    assert!(service.get("default", "ghost").unwrap_err().is_not_found());
    assert!(
        service
            .replace("default", "ghost", ProfileFields::default(), None)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        service
            .patch("default", "ghost", ProfilePatch::default(), None)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        service
            .delete("default", "ghost", None)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_default_profile_cannot_be_deleted_or_renamed_anywhere() {
    let Node {
        service,
        projects,
        store,
        ..
    } = node();
    projects.set_profile_isolation("team-a", true);
    store.ensure_namespace("team-a");

    for project in ["default", "team-a"] {
        let err = service.delete(project, "default", None).await.unwrap_err();
        assert!(matches!(err, CoreError::Forbidden { .. }), "{project}");

        let err = service
            .rename(project, "default", "other", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden { .. }), "{project}");
    }
}

#[tokio::test]
async fn test_delete_blocked_while_in_use() {
    let Node {
        service, instances, ..
    } = node();
    service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap();
    instances.attach("default", "c1", "web");

    let err = service.delete("default", "web", None).await.unwrap_err();
    assert!(matches!(err, CoreError::InUse { ref instances, .. } if instances == &["c1"]));
    assert!(service.get("default", "web").is_ok());

    instances.detach("default", "c1", "web");
    service.delete("default", "web", None).await.unwrap();
    assert!(service.get("default", "web").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_rename_blocked_while_in_use() {
    let Node {
        service, instances, ..
    } = node();
    service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap();
    instances.attach("default", "c1", "web");

    let err = service
        .rename("default", "web", "frontend", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InUse { ref instances, .. } if instances == &["c1"]));
    assert!(service.get("default", "web").is_ok());
    assert!(service.get("default", "frontend").unwrap_err().is_not_found());

    // The reference still blocks delete under the original name.
    let err = service.delete("default", "web", None).await.unwrap_err();
    assert!(matches!(err, CoreError::InUse { .. }));

    let err = service
        .apply_notification(
            "default",
            ProfileMutation::Rename {
                name: "web".into(),
                new_name: "frontend".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::InUse { .. }));

    instances.detach("default", "c1", "web");
    service
        .rename("default", "web", "frontend", None)
        .await
        .unwrap();
    assert!(service.get("default", "frontend").is_ok());
}

#[tokio::test]
async fn test_rename_conflict_and_success() {
    let Node { service, .. } = node();
    service
        .create("default", new_profile("web", &[("limits.cpu", "2")]))
        .await
        .unwrap();
    service
        .create("default", new_profile("db", &[]))
        .await
        .unwrap();

    let err = service
        .rename("default", "web", "db", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));

    let before = service.get("default", "web").unwrap();
    let uri = service
        .rename("default", "web", "frontend", Some(&before.etag))
        .await
        .unwrap();
    assert_eq!(uri, "/1.0/profiles/frontend");
    assert!(service.get("default", "web").unwrap_err().is_not_found());
    let after = service.get("default", "frontend").unwrap();
    assert_eq!(after.profile.fields, before.profile.fields);
    assert_eq!(after.etag, before.etag);
}

#[tokio::test]
async fn test_stale_token_blocks_delete_and_rename() {
    let Node { service, .. } = node();
    service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap();
    let stale = service.get("default", "web").unwrap().etag;
    service
        .patch("default", "web", patch(json!({ "description": "v2" })), None)
        .await
        .unwrap();

    let err = service
        .rename("default", "web", "x", Some(&stale))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PreconditionFailed { .. }));
    let err = service
        .delete("default", "web", Some(&stale))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PreconditionFailed { .. }));
}

// ── Namespaces ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_shared_project_aliases_default_namespace() {
    let Node {
        service, projects, ..
    } = node();
    projects.set_profile_isolation("shared", false);

    let uri = service
        .create("shared", new_profile("web", &[]))
        .await
        .unwrap();
    assert_eq!(uri, "/1.0/profiles/web");
    assert!(service.get("default", "web").is_ok());
    assert!(service.get("shared", "web").is_ok());
}

#[tokio::test]
async fn test_isolated_project_keeps_own_profiles() {
    let Node {
        service,
        projects,
        store,
        ..
    } = node();
    projects.set_profile_isolation("team-a", true);
    store.ensure_namespace("team-a");

    let uri = service
        .create("team-a", new_profile("web", &[]))
        .await
        .unwrap();
    assert_eq!(uri, "/1.0/profiles/web?project=team-a");
    assert!(service.get("default", "web").unwrap_err().is_not_found());

    match service.list("team-a", false).unwrap() {
        ProfileListing::Uris(uris) => assert_eq!(
            uris,
            vec![
                "/1.0/profiles/default?project=team-a",
                "/1.0/profiles/web?project=team-a",
            ]
        ),
        other => panic!("expected URIs, got {other:?}"),
    }
    match service.list("team-a", true).unwrap() {
        ProfileListing::Full(profiles) => assert_eq!(profiles.len(), 2),
        other => panic!("expected profiles, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_project_fails() {
    let Node { service, .. } = node();
    let err = service.list("ghost", false).unwrap_err();
    assert!(matches!(err, CoreError::NamespaceNotFound { .. }));
}

// ── Propagation ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_mutation_is_propagated() {
    let recorder = Arc::new(RecordingNode::default());
    let Node { service, .. } = node_with(vec![Arc::clone(&recorder) as _]);

    service
        .create("default", new_profile("web", &[("a", "1")]))
        .await
        .unwrap();
    service
        .patch("default", "web", patch(json!({ "config": { "b": "2" } })), None)
        .await
        .unwrap();
    service
        .rename("default", "web", "frontend", None)
        .await
        .unwrap();
    service.delete("default", "frontend", None).await.unwrap();

    let seen = recorder.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 4);
    assert_eq!(
        seen[0],
        (
            "default".to_owned(),
            ProfileMutation::Create {
                name: "web".into(),
                fields: fields("", &[("a", "1")]),
            }
        )
    );
    assert_eq!(
        seen[1].1,
        ProfileMutation::Update {
            name: "web".into(),
            prior: fields("", &[("a", "1")]),
            fields: fields("", &[("a", "1"), ("b", "2")]),
        }
    );
    assert_eq!(
        seen[2].1,
        ProfileMutation::Rename {
            name: "web".into(),
            new_name: "frontend".into(),
        }
    );
    assert_eq!(
        seen[3].1,
        ProfileMutation::Delete {
            name: "frontend".into()
        }
    );
}

#[tokio::test]
async fn test_failed_mutation_is_not_propagated() {
    let recorder = Arc::new(RecordingNode::default());
    let Node { service, .. } = node_with(vec![Arc::clone(&recorder) as _]);

    let _ = service.delete("default", "default", None).await;
    let _ = service
        .create("default", new_profile("bad/name", &[]))
        .await;
    assert!(recorder.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_peer_does_not_fail_the_write() {
    let Node { service, .. } = node_with(vec![Arc::new(DeadNode)]);
    service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap();
    assert!(service.get("default", "web").is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_hanging_peer_is_bounded_by_timeout() {
    let recorder = Arc::new(RecordingNode::default());
    let Node { service, .. } =
        node_with(vec![Arc::new(HangingNode), Arc::clone(&recorder) as _]);

    let started = tokio::time::Instant::now();
    service
        .create("default", new_profile("web", &[]))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(recorder.seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_notifications_are_not_propagated_again() {
    let recorder = Arc::new(RecordingNode::default());
    let Node { service, .. } = node_with(vec![Arc::clone(&recorder) as _]);

    service
        .apply_notification(
            "default",
            ProfileMutation::Create {
                name: "web".into(),
                fields: fields("", &[]),
            },
        )
        .unwrap();
    assert!(service.get("default", "web").is_ok());
    assert!(recorder.seen.lock().unwrap().is_empty());
}

// ── Receiving notifications ─────────────────────────────────────────

#[tokio::test]
async fn test_two_nodes_converge() {
    let peer = node();
    let origin = node_with(vec![Arc::new(InProcessNode {
        service: peer.service.clone(),
    })]);

    origin
        .service
        .create("default", new_profile("web", &[("limits.cpu", "2")]))
        .await
        .unwrap();
    origin
        .service
        .patch(
            "default",
            "web",
            patch(json!({ "config": { "limits.memory": "1GB" } })),
            None,
        )
        .await
        .unwrap();
    assert_eq!(
        peer.service.get("default", "web").unwrap(),
        origin.service.get("default", "web").unwrap()
    );

    origin
        .service
        .rename("default", "web", "frontend", None)
        .await
        .unwrap();
    assert!(peer.service.get("default", "frontend").is_ok());

    origin
        .service
        .delete("default", "frontend", None)
        .await
        .unwrap();
    assert!(peer.service.get("default", "frontend").unwrap_err().is_not_found());
    assert_eq!(peer.store.len(), origin.store.len());
}

#[tokio::test]
async fn test_notifications_are_idempotent() {
    let Node { service, .. } = node();
    let create = ProfileMutation::Create {
        name: "web".into(),
        fields: fields("", &[("a", "1")]),
    };
    let update = ProfileMutation::Update {
        name: "web".into(),
        prior: fields("", &[("a", "1")]),
        fields: fields("", &[("a", "2")]),
    };
    let rename = ProfileMutation::Rename {
        name: "web".into(),
        new_name: "frontend".into(),
    };
    let delete = ProfileMutation::Delete {
        name: "frontend".into(),
    };

    for mutation in [create, update, rename, delete] {
        service.apply_notification("default", mutation.clone()).unwrap();
        service.apply_notification("default", mutation).unwrap();
    }
    assert!(service.get("default", "frontend").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_diverged_peer_rejects_update() {
    let Node { service, .. } = node();
    service
        .create("default", new_profile("web", &[("a", "local")]))
        .await
        .unwrap();

    let err = service
        .apply_notification(
            "default",
            ProfileMutation::Update {
                name: "web".into(),
                prior: fields("", &[("a", "origin")]),
                fields: fields("", &[("a", "new")]),
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::PreconditionFailed { .. }));
    assert_eq!(
        service.get("default", "web").unwrap().profile.fields,
        fields("", &[("a", "local")])
    );
}

#[tokio::test]
async fn test_conflicting_create_notification_fails() {
    let Node { service, .. } = node();
    service
        .create("default", new_profile("web", &[("a", "1")]))
        .await
        .unwrap();

    let err = service
        .apply_notification(
            "default",
            ProfileMutation::Create {
                name: "web".into(),
                fields: fields("", &[("a", "2")]),
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_notification_cannot_touch_default_profile() {
    let Node { service, .. } = node();
    let err = service
        .apply_notification(
            "default",
            ProfileMutation::Delete {
                name: "default".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden { .. }));
}

// ── Remote members ──────────────────────────────────────────────────

#[tokio::test]
async fn test_remote_node_delivers_update_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/1.0/profiles/web"))
        .and(query_param("project", "default"))
        .and(header("X-Profiled-Notification", "1"))
        .and(body_json(json!({
            "prior": { "description": "", "config": { "a": "1" }, "devices": {} },
            "fields": { "description": "", "config": { "a": "1", "b": "2" }, "devices": {} }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "sync",
            "status_code": 200,
            "metadata": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cluster = profiled_core::ClusterConfig {
        peers: vec![profiled_core::PeerConfig {
            name: "node2".into(),
            url: server.uri().parse().unwrap(),
        }],
        ..profiled_core::ClusterConfig::default()
    };
    let membership = StaticMembership::from_config(&cluster).unwrap();
    assert_eq!(membership.len(), 1);

    let Node { service, .. } = node_in(Arc::new(membership));

    service
        .create("default", new_profile("web", &[("a", "1")]))
        .await
        .unwrap();
    service
        .patch("default", "web", patch(json!({ "config": { "b": "2" } })), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_received_notifications_replay_on_peer() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "sync",
            "status_code": 200,
            "metadata": null
        })))
        .mount(&server)
        .await;

    let cluster = profiled_core::ClusterConfig {
        peers: vec![profiled_core::PeerConfig {
            name: "node2".into(),
            url: server.uri().parse().unwrap(),
        }],
        ..profiled_core::ClusterConfig::default()
    };
    let origin = node_in(Arc::new(StaticMembership::from_config(&cluster).unwrap()));
    let peer = node();

    origin
        .service
        .create("default", new_profile("web", &[("a", "1")]))
        .await
        .unwrap();
    origin
        .service
        .patch("default", "web", patch(json!({ "config": { "b": "2" } })), None)
        .await
        .unwrap();
    origin
        .service
        .create("default", new_profile("scratch", &[]))
        .await
        .unwrap();
    origin
        .service
        .rename("default", "web", "frontend", None)
        .await
        .unwrap();
    origin.service.delete("default", "scratch", None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
    for request in requests {
        let segments: Vec<&str> = request.url.path_segments().unwrap().collect();
        assert_eq!(&segments[..2], &["1.0", "profiles"]);
        let project = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "project")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let mutation = ProfileMutation::from_notification(
            request.method.as_str(),
            segments.get(2).copied(),
            &request.body,
        )
        .unwrap();
        peer.service.apply_notification(&project, mutation).unwrap();
    }

    let expected = origin.service.get("default", "frontend").unwrap();
    let replayed = peer.service.get("default", "frontend").unwrap();
    assert_eq!(replayed.profile.fields, expected.profile.fields);
    assert_eq!(replayed.etag, expected.etag);
    assert!(matches!(
        peer.service.get("default", "web"),
        Err(CoreError::NotFound { .. })
    ));
    assert!(matches!(
        peer.service.get("default", "scratch"),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn test_fingerprint_parses_from_display() {
    let fp = Fingerprint::compute(&fields("x", &[("a", "1")]));
    assert_eq!(fp.to_string().parse::<Fingerprint>().unwrap(), fp);
}

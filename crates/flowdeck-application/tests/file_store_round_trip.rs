//! End-to-end round trips through the file-backed store: what a user
//! sees after quitting and relaunching the dashboard.

use std::sync::Arc;
use std::time::Duration;

use flowdeck_application::{AuthService, WorkflowService};
use flowdeck_core::auth::{EmailHeuristicRoleResolver, NewProfile, ProfileUpdate};
use flowdeck_core::workflow::{NewWorkflow, SimulatedBackend};
use flowdeck_infrastructure::JsonFileStore;
use tempfile::TempDir;

fn auth_over(store: Arc<JsonFileStore>) -> AuthService {
    AuthService::new(store, Arc::new(EmailHeuristicRoleResolver))
        .with_latency(Duration::ZERO)
}

fn workflows_over(store: Arc<JsonFileStore>) -> WorkflowService {
    WorkflowService::new(store, Arc::new(SimulatedBackend::new()))
}

#[tokio::test]
async fn session_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let auth = auth_over(store.clone());
    auth.sign_up("carol@x.com", "pw", NewProfile::default())
        .await
        .unwrap();
    auth.update_profile(ProfileUpdate {
        company: Some("Acme".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    // "Restart": a fresh service over the same directory.
    let auth2 = auth_over(store);
    auth2.hydrate().await.unwrap();

    assert!(auth2.is_authenticated());
    let profile = auth2.profile().unwrap();
    assert_eq!(profile.email, "carol@x.com");
    assert_eq!(profile.company, "Acme");
}

#[tokio::test]
async fn workflow_list_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let workflows = workflows_over(store.clone());
    workflows.hydrate().await.unwrap();
    let created = workflows
        .create_workflow(NewWorkflow {
            name: "Nightly Report".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    workflows.delete_workflow("3").await.unwrap();

    let workflows2 = workflows_over(store);
    workflows2.hydrate().await.unwrap();

    let list = workflows2.workflows();
    assert_eq!(list.len(), 3); // 3 seeded - 1 deleted + 1 created
    assert!(list.iter().any(|w| w.id == created.id));
    assert!(!list.iter().any(|w| w.id == "3"));
}

#[tokio::test]
async fn sign_out_wipes_the_state_directory_keys() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let auth = auth_over(store.clone());
    auth.sign_up("carol@x.com", "pw", NewProfile::default())
        .await
        .unwrap();
    let workflows = workflows_over(store.clone());
    workflows.hydrate().await.unwrap();

    auth.sign_out().await.unwrap();

    assert!(!dir.path().join("flowdeck-session.json").exists());
    assert!(!dir.path().join("flowdeck-profile.json").exists());
    assert!(!dir.path().join("flowdeck-workflows.json").exists());

    let auth2 = auth_over(store);
    auth2.hydrate().await.unwrap();
    assert!(!auth2.loading());
    assert!(auth2.session().is_none());
}

#[tokio::test]
async fn corrupt_workflow_blob_reseeds_the_demo_list() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("flowdeck-workflows.json"), "{oops").unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));

    let workflows = workflows_over(store);
    workflows.hydrate().await.unwrap();

    assert_eq!(workflows.workflows().len(), 3);
}

//! Application wiring.
//!
//! Services are explicitly constructed here with their collaborators
//! injected, and their lifecycle is tied to the owning [`Flowdeck`]
//! handle; there are no module-level singletons. The presentation layer
//! holds a `Flowdeck` and reads/invokes through it.

use std::sync::Arc;
use std::time::Duration;

use flowdeck_core::Result;
use flowdeck_core::auth::EmailHeuristicRoleResolver;
use flowdeck_core::config::AppConfig;
use flowdeck_core::store::StateStore;
use flowdeck_core::workflow::SimulatedBackend;
use flowdeck_infrastructure::{FlowdeckPaths, JsonFileStore, load_config};
use flowdeck_remote::WorkflowApiClient;

use crate::auth_service::AuthService;
use crate::remote_workflow_service::RemoteWorkflowService;
use crate::workflow_service::WorkflowService;

/// Root handle owning the application services.
pub struct Flowdeck {
    auth: Arc<AuthService>,
    workflows: Arc<WorkflowService>,
    config: AppConfig,
}

impl Flowdeck {
    /// Initializes the application with the default file-backed store
    /// and configuration from the platform config directory.
    pub async fn init() -> Result<Self> {
        let config = load_config()?;
        let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(FlowdeckPaths::state_dir()?));
        Self::with_store(store, config).await
    }

    /// Initializes the application over an explicit store and config
    /// (tests inject a memory store here).
    pub async fn with_store(store: Arc<dyn StateStore>, config: AppConfig) -> Result<Self> {
        let auth = Arc::new(
            AuthService::new(store.clone(), Arc::new(EmailHeuristicRoleResolver))
                .with_latency(Duration::from_millis(config.simulated_latency_ms)),
        );
        auth.hydrate().await?;

        let workflows = Arc::new(WorkflowService::new(
            store,
            Arc::new(SimulatedBackend::new()),
        ));
        if auth.is_authenticated() {
            workflows.hydrate().await?;
        }

        Ok(Self {
            auth,
            workflows,
            config,
        })
    }

    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    /// The local demo workflow container.
    pub fn workflows(&self) -> &Arc<WorkflowService> {
        &self.workflows
    }

    /// The API-backed workflow container. Profile-supplied API settings
    /// take precedence; the `[api]` config section serves as the
    /// deployment-wide fallback. `None` when neither is present or no
    /// one is signed in.
    pub fn remote_workflows(&self) -> Option<RemoteWorkflowService> {
        if let Some(service) = RemoteWorkflowService::from_profile(self.auth.clone()) {
            return Some(service);
        }
        if !self.auth.is_authenticated() {
            return None;
        }
        let api = self.config.api.as_ref()?;
        Some(RemoteWorkflowService::new(
            WorkflowApiClient::new(api.base_url.clone(), api.api_key.clone()),
            self.auth.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdeck_core::auth::NewProfile;
    use flowdeck_infrastructure::MemoryStore;

    fn test_config() -> AppConfig {
        AppConfig {
            api: None,
            simulated_latency_ms: 0,
        }
    }

    #[tokio::test]
    async fn fresh_install_starts_unauthenticated() {
        let store = Arc::new(MemoryStore::new());
        let app = Flowdeck::with_store(store, test_config()).await.unwrap();

        assert!(!app.auth().is_authenticated());
        assert!(!app.auth().loading());
        assert!(app.workflows().workflows().is_empty());
    }

    #[tokio::test]
    async fn restart_restores_session_and_workflows() {
        let store = Arc::new(MemoryStore::new());

        let app = Flowdeck::with_store(store.clone(), test_config())
            .await
            .unwrap();
        app.auth()
            .sign_up("carol@x.com", "pw", NewProfile::default())
            .await
            .unwrap();
        app.workflows().hydrate().await.unwrap();

        let restarted = Flowdeck::with_store(store, test_config()).await.unwrap();
        assert!(restarted.auth().is_authenticated());
        assert_eq!(restarted.workflows().workflows().len(), 3);
    }

    #[tokio::test]
    async fn remote_container_requires_profile_api_settings() {
        let store = Arc::new(MemoryStore::new());
        let app = Flowdeck::with_store(store, test_config()).await.unwrap();
        app.auth()
            .sign_up("carol@x.com", "pw", NewProfile::default())
            .await
            .unwrap();

        assert!(app.remote_workflows().is_none());

        app.auth()
            .update_profile(flowdeck_core::auth::ProfileUpdate {
                api_base_url: Some(Some("https://automation.example.com/api/v1".to_string())),
                api_key: Some(Some("key-123".to_string())),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(app.remote_workflows().is_some());
    }

    #[tokio::test]
    async fn config_api_settings_back_remote_container() {
        let store = Arc::new(MemoryStore::new());
        let config = AppConfig {
            api: Some(flowdeck_core::config::ApiSettings {
                base_url: "https://shared.example.com/api/v1".to_string(),
                api_key: "deployment-key".to_string(),
            }),
            simulated_latency_ms: 0,
        };
        let app = Flowdeck::with_store(store, config).await.unwrap();

        // No fallback for anonymous callers.
        assert!(app.remote_workflows().is_none());

        app.auth()
            .sign_up("carol@x.com", "pw", NewProfile::default())
            .await
            .unwrap();

        let remote = app.remote_workflows().unwrap();
        assert_eq!(remote.api_base_url(), "https://shared.example.com/api/v1");
    }

    #[tokio::test]
    async fn profile_api_settings_take_precedence_over_config() {
        let store = Arc::new(MemoryStore::new());
        let config = AppConfig {
            api: Some(flowdeck_core::config::ApiSettings {
                base_url: "https://shared.example.com/api/v1".to_string(),
                api_key: "deployment-key".to_string(),
            }),
            simulated_latency_ms: 0,
        };
        let app = Flowdeck::with_store(store, config).await.unwrap();
        app.auth()
            .sign_up("carol@x.com", "pw", NewProfile::default())
            .await
            .unwrap();
        app.auth()
            .update_profile(flowdeck_core::auth::ProfileUpdate {
                api_base_url: Some(Some("https://mine.example.com/api/v1".to_string())),
                api_key: Some(Some("personal-key".to_string())),
                ..Default::default()
            })
            .await
            .unwrap();

        let remote = app.remote_workflows().unwrap();
        assert_eq!(remote.api_base_url(), "https://mine.example.com/api/v1");
    }
}

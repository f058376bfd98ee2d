//! Auth state container.
//!
//! Owns the current session and profile, persists both to the state
//! store, and exposes the sign-up/sign-in/sign-out/update-profile
//! operations. There is no backend: sign-up and sign-in fabricate local
//! records after a short simulated delay, and the password is never
//! checked (demo semantics; a real deployment replaces this whole
//! service behind the same surface).
//!
//! All mutations are persist-then-commit: the durable write happens
//! first, the in-memory state changes only when it succeeds, so a failed
//! write never leaves memory and disk diverged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use flowdeck_core::auth::{
    NewProfile, Profile, ProfileUpdate, Role, RoleResolver, Session, SubscriptionPlan,
};
use flowdeck_core::error::{FlowdeckError, Result};
use flowdeck_core::store::{
    KEY_PROFILE, KEY_SESSION, KEY_WORKFLOWS, StateStore, load_json, save_json,
};

/// Authentication state.
///
/// `Authenticating` is transient: it is only observable from another
/// task while a sign-up/sign-in is in flight.
#[derive(Debug, Clone, Default)]
enum AuthState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated {
        session: Session,
        profile: Profile,
    },
}

/// Service owning the current session and profile.
pub struct AuthService {
    store: Arc<dyn StateStore>,
    roles: Arc<dyn RoleResolver>,
    state: RwLock<AuthState>,
    loading: AtomicBool,
    latency: Duration,
}

impl AuthService {
    /// Creates an auth service over `store`.
    ///
    /// The service starts Unauthenticated; call [`hydrate`](Self::hydrate)
    /// to restore a persisted session.
    pub fn new(store: Arc<dyn StateStore>, roles: Arc<dyn RoleResolver>) -> Self {
        Self {
            store,
            roles,
            state: RwLock::new(AuthState::Unauthenticated),
            loading: AtomicBool::new(false),
            latency: Duration::from_millis(1000),
        }
    }

    /// Overrides the simulated network latency (zero disables it).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Restores a persisted session, if one exists.
    ///
    /// Both the session and profile blobs must be present; anything less
    /// leaves the service Unauthenticated. Never fails: corrupt state is
    /// treated as absent by the store.
    pub async fn hydrate(&self) -> Result<()> {
        self.loading.store(true, Ordering::SeqCst);

        let session: Option<Session> = load_json(self.store.as_ref(), KEY_SESSION)?;
        let profile: Option<Profile> = load_json(self.store.as_ref(), KEY_PROFILE)?;

        if let (Some(session), Some(profile)) = (session, profile) {
            tracing::debug!(email = %session.email, "restored persisted session");
            *self.state.write().unwrap() = AuthState::Authenticated { session, profile };
        }

        self.loading.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Creates a new account and signs it in.
    ///
    /// Role is fixed to `user`, the token count starts at zero and the
    /// plan at `free`. Returns the created session.
    pub async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        fields: NewProfile,
    ) -> Result<Session> {
        self.begin_transition();
        let result = self.sign_up_inner(email, fields).await;
        self.finish_transition(&result);
        result
    }

    async fn sign_up_inner(&self, email: &str, fields: NewProfile) -> Result<Session> {
        self.simulate_latency().await;

        let session = Session::new(email);
        let profile = Profile::for_sign_up(&session, fields);

        save_json(self.store.as_ref(), KEY_SESSION, &session)?;
        save_json(self.store.as_ref(), KEY_PROFILE, &profile)?;

        *self.state.write().unwrap() = AuthState::Authenticated {
            session: session.clone(),
            profile,
        };

        tracing::info!(email, "account created");
        Ok(session)
    }

    /// Signs in with an email address.
    ///
    /// If a persisted session matches the email, it is restored as-is
    /// (the password is accepted unchecked; this is demo state, not a
    /// security boundary). Otherwise a demo account is fabricated with a
    /// role supplied by the injected resolver.
    pub async fn sign_in(&self, email: &str, _password: &str) -> Result<Session> {
        self.begin_transition();
        let result = self.sign_in_inner(email).await;
        self.finish_transition(&result);
        result
    }

    async fn sign_in_inner(&self, email: &str) -> Result<Session> {
        self.simulate_latency().await;

        let persisted_session: Option<Session> = load_json(self.store.as_ref(), KEY_SESSION)?;
        let persisted_profile: Option<Profile> = load_json(self.store.as_ref(), KEY_PROFILE)?;

        if let (Some(session), Some(profile)) = (persisted_session, persisted_profile) {
            if session.email == email {
                tracing::debug!(email, "re-authenticated persisted session");
                *self.state.write().unwrap() = AuthState::Authenticated {
                    session: session.clone(),
                    profile,
                };
                return Ok(session);
            }
        }

        // No matching account: fabricate a demo one.
        let role = self.roles.resolve(email);
        let session = Session::new(email);
        let profile = demo_profile(&session, role);

        save_json(self.store.as_ref(), KEY_SESSION, &session)?;
        save_json(self.store.as_ref(), KEY_PROFILE, &profile)?;

        *self.state.write().unwrap() = AuthState::Authenticated {
            session: session.clone(),
            profile,
        };

        tracing::info!(email, ?role, "signed in with fabricated demo account");
        Ok(session)
    }

    /// Signs out, clearing every persisted key.
    pub async fn sign_out(&self) -> Result<()> {
        self.store.remove(KEY_SESSION)?;
        self.store.remove(KEY_PROFILE)?;
        self.store.remove(KEY_WORKFLOWS)?;

        *self.state.write().unwrap() = AuthState::Unauthenticated;
        tracing::info!("signed out");
        Ok(())
    }

    /// Merges `update` into the current profile.
    ///
    /// Persist-then-commit: the merged profile is written to the store
    /// first and only replaces the in-memory copy on success.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile> {
        let mut merged = self
            .profile()
            .ok_or_else(|| FlowdeckError::internal("update_profile without a signed-in user"))?;
        merged.apply(update);

        save_json(self.store.as_ref(), KEY_PROFILE, &merged)?;

        let mut state = self.state.write().unwrap();
        if let AuthState::Authenticated { profile, .. } = &mut *state {
            *profile = merged.clone();
        }
        Ok(merged)
    }

    /// Adds `count` to the profile's token counter (execution accounting
    /// side effect for the API-backed workflow service).
    pub async fn record_token_usage(&self, count: u64) -> Result<Profile> {
        let current = self
            .profile()
            .ok_or_else(|| FlowdeckError::internal("token usage without a signed-in user"))?;

        self.update_profile(ProfileUpdate {
            token_count: Some(current.token_count + count),
            ..Default::default()
        })
        .await
    }

    /// The current session, if authenticated.
    pub fn session(&self) -> Option<Session> {
        match &*self.state.read().unwrap() {
            AuthState::Authenticated { session, .. } => Some(session.clone()),
            _ => None,
        }
    }

    /// The current profile, if authenticated.
    pub fn profile(&self) -> Option<Profile> {
        match &*self.state.read().unwrap() {
            AuthState::Authenticated { profile, .. } => Some(profile.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.state.read().unwrap(), AuthState::Authenticated { .. })
    }

    /// True while hydration or a sign-up/sign-in is in flight. Consumers
    /// should render nothing definitive while this is set.
    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn begin_transition(&self) {
        self.loading.store(true, Ordering::SeqCst);
        let mut state = self.state.write().unwrap();
        if !matches!(&*state, AuthState::Authenticated { .. }) {
            *state = AuthState::Authenticating;
        }
    }

    fn finish_transition<T>(&self, result: &Result<T>) {
        if result.is_err() {
            let mut state = self.state.write().unwrap();
            if matches!(&*state, AuthState::Authenticating) {
                *state = AuthState::Unauthenticated;
            }
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Builds the fabricated profile used when signing in without a
/// persisted account. Field values mirror the demo dataset the dashboard
/// ships with.
fn demo_profile(session: &Session, role: Role) -> Profile {
    let (first_name, company) = if role == Role::Client {
        ("Client", "Client Company")
    } else {
        ("Demo", "Demo Company")
    };

    Profile {
        id: session.id.clone(),
        email: session.email.clone(),
        first_name: first_name.to_string(),
        last_name: "User".to_string(),
        company: company.to_string(),
        phone: String::new(),
        bio: String::new(),
        avatar_url: String::new(),
        token_count: 150,
        subscription_plan: SubscriptionPlan::Starter,
        role,
        created_at: session.created_at,
        api_base_url: None,
        api_key: None,
    }
}

//! Account domain models.
//!
//! A `Session` is the immutable identity record created at sign-up or
//! sign-in; a `Profile` carries the mutable account attributes and shares
//! the session's id. Both are persisted as JSON blobs in the state store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse authorization role attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account.
    #[default]
    User,
    /// Client account with a reduced dashboard surface.
    Client,
    /// Administrative account.
    Admin,
}

/// Billing plan attached to a profile. Display-only; no payment
/// processing is wired to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Starter,
    Pro,
    Enterprise,
}

/// The immutable identity record for an authenticated user.
///
/// Created at sign-up/sign-in and never mutated afterwards; replaced
/// wholesale on sign-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh session for `email` with a generated id.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

/// Mutable account attributes. Invariant: `id` equals the owning
/// session's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub token_count: u64,
    #[serde(default)]
    pub subscription_plan: SubscriptionPlan,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    /// Base URL of the remote workflow API, when the account is wired to
    /// one. Presence of both this and `api_key` enables the API-backed
    /// workflow service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// API key for the remote workflow API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Profile {
    /// Builds the profile created alongside a fresh sign-up session.
    ///
    /// Role is fixed to `user`, the token count starts at zero and the
    /// plan at `free`.
    pub fn for_sign_up(session: &Session, fields: NewProfile) -> Self {
        Self {
            id: session.id.clone(),
            email: session.email.clone(),
            first_name: fields.first_name.unwrap_or_default(),
            last_name: fields.last_name.unwrap_or_default(),
            company: fields.company.unwrap_or_default(),
            phone: String::new(),
            bio: String::new(),
            avatar_url: String::new(),
            token_count: 0,
            subscription_plan: SubscriptionPlan::Free,
            role: Role::User,
            created_at: session.created_at,
            api_base_url: None,
            api_key: None,
        }
    }

    /// Merges the supplied fields over this profile, leaving everything
    /// not present in `update` untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(company) = update.company {
            self.company = company;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(avatar_url) = update.avatar_url {
            self.avatar_url = avatar_url;
        }
        if let Some(token_count) = update.token_count {
            self.token_count = token_count;
        }
        if let Some(subscription_plan) = update.subscription_plan {
            self.subscription_plan = subscription_plan;
        }
        if let Some(api_base_url) = update.api_base_url {
            self.api_base_url = api_base_url;
        }
        if let Some(api_key) = update.api_key {
            self.api_key = api_key;
        }
    }
}

/// Optional fields supplied at sign-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
}

/// Partial profile update. `None` means "leave unchanged"; for the two
/// API settings, `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub token_count: Option<u64>,
    pub subscription_plan: Option<SubscriptionPlan>,
    pub api_base_url: Option<Option<String>>,
    pub api_key: Option<Option<String>>,
}

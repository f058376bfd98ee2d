//! Account domain: session identity, profile, roles.

pub mod model;
pub mod resolver;

pub use model::{NewProfile, Profile, ProfileUpdate, Role, Session, SubscriptionPlan};
pub use resolver::{EmailHeuristicRoleResolver, RoleResolver};

//! Namespace based database routing.
//!
//! Every model belongs to exactly one namespace (the application that owns
//! it) and every namespace lives in exactly one physical database. The
//! router is therefore a flat lookup with no per-model overrides. A `None`
//! answer means the router has no opinion and the caller applies its own
//! default.

use serde::Serialize;

use super::target::DbTarget;

/// Framework bookkeeping namespaces. Relations touching any of these are
/// always allowed.
pub const FRAMEWORK_NAMESPACES: [&str; 4] = ["auth", "contenttypes", "sessions", "admin"];

/// This application's own administrative namespace (the local admin users).
pub const ADMINISTRATOR_NAMESPACE: &str = "administrator";

pub const AUTHENTICATION_NAMESPACE: &str = "authentication";
pub const MOVIE_NAMESPACE: &str = "movie";
pub const NOTIFICATION_NAMESPACE: &str = "notification";
pub const USER_PROFILE_NAMESPACE: &str = "user_profile";

/// Outcome of a relation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationRule {
    Permitted,
    Undecided,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DbRouter;

impl DbRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn choose_for_read(&self, namespace: &str) -> Option<DbTarget> {
        route(namespace)
    }

    /// Writes go to the same database as reads; there is no replica split.
    pub fn choose_for_write(&self, namespace: &str) -> Option<DbTarget> {
        route(namespace)
    }

    pub fn allow_relation(&self, namespace_a: &str, namespace_b: &str) -> RelationRule {
        if is_framework(namespace_a) || is_framework(namespace_b) || namespace_a == namespace_b {
            RelationRule::Permitted
        } else {
            RelationRule::Undecided
        }
    }

    /// Database that owns the schema of `namespace`. The requested database
    /// does not change the answer; see [`DbRouter::should_migrate`] for the
    /// yes/no form.
    pub fn allow_migration(&self, _target_db: DbTarget, namespace: &str) -> Option<DbTarget> {
        route(namespace)
    }

    /// Whether `namespace` tables belong on `db`. `None` when the namespace
    /// is unknown to the router.
    pub fn should_migrate(&self, db: DbTarget, namespace: &str) -> Option<bool> {
        self.allow_migration(db, namespace).map(|owner| owner == db)
    }

    /// Read target with the admin layer's fallback applied
    pub fn resolve(&self, namespace: &str) -> DbTarget {
        self.choose_for_read(namespace).unwrap_or(DbTarget::Default)
    }
}

fn is_framework(namespace: &str) -> bool {
    FRAMEWORK_NAMESPACES.contains(&namespace)
}

fn route(namespace: &str) -> Option<DbTarget> {
    match namespace {
        "auth" | "contenttypes" | "sessions" | "admin" | ADMINISTRATOR_NAMESPACE => {
            Some(DbTarget::Default)
        }
        AUTHENTICATION_NAMESPACE => Some(DbTarget::Auth),
        MOVIE_NAMESPACE => Some(DbTarget::Movie),
        NOTIFICATION_NAMESPACE => Some(DbTarget::Notification),
        USER_PROFILE_NAMESPACE => Some(DbTarget::Profile),
        _ => None,
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical database a namespace can be routed to.
///
/// Each target is a separately provisioned Postgres database owned by one
/// bounded context (framework bookkeeping, identity, catalog, notifications,
/// user profiles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbTarget {
    Default,
    Auth,
    Movie,
    Notification,
    Profile,
}

impl DbTarget {
    pub const ALL: [DbTarget; 5] = [
        DbTarget::Default,
        DbTarget::Auth,
        DbTarget::Movie,
        DbTarget::Notification,
        DbTarget::Profile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DbTarget::Default => "default",
            DbTarget::Auth => "auth",
            DbTarget::Movie => "movie",
            DbTarget::Notification => "notification",
            DbTarget::Profile => "profile",
        }
    }

    /// Prefix of the `<PREFIX>_DB_*` environment variables for this target
    pub fn env_prefix(&self) -> &'static str {
        match self {
            DbTarget::Default => "DEFAULT",
            DbTarget::Auth => "AUTH",
            DbTarget::Movie => "MOVIE",
            DbTarget::Notification => "NOTIFICATION",
            DbTarget::Profile => "PROFILE",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            DbTarget::Default | DbTarget::Notification => 5432,
            DbTarget::Auth => 5433,
            DbTarget::Movie => 5434,
            DbTarget::Profile => 5435,
        }
    }
}

impl fmt::Display for DbTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown database target: {0}")]
pub struct UnknownTarget(pub String);

impl FromStr for DbTarget {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DbTarget::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| UnknownTarget(s.to_string()))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Local admin account, created on first successful external login.
/// Lives in the `default` database, unique by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl AdminUser {
    /// A record as it is first materialised for `email`
    pub fn new_privileged(email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_staff: true,
            is_superuser: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

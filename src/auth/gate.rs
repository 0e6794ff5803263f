use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::provider::{IdentityProvider, ProviderError};
use super::token::decode_unverified;
use crate::config::IdentityConfig;
use crate::database::models::AdminUser;
use crate::database::{DatabaseError, UserStore};

/// Errors that escape the gate. Ordinary login failures never show up here;
/// they are reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider contract violation: {0}")]
    ProviderContract(String),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Why a login was refused. Logged, never returned.
#[derive(Debug)]
enum Denial {
    EmptyCredentials,
    ProviderUnreachable(String),
    Rejected(u16),
    BadToken(String),
    RoleNotAllowed(Option<String>),
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::EmptyCredentials => write!(f, "empty username or password"),
            Denial::ProviderUnreachable(e) => write!(f, "identity provider unreachable: {}", e),
            Denial::Rejected(status) => write!(f, "identity provider answered {}", status),
            Denial::BadToken(e) => write!(f, "access token unusable: {}", e),
            Denial::RoleNotAllowed(Some(role)) => write!(f, "role '{}' is not allowed", role),
            Denial::RoleNotAllowed(None) => write!(f, "token carries no role"),
        }
    }
}

enum Failure {
    Denied(Denial),
    Fatal(AuthError),
}

impl From<Denial> for Failure {
    fn from(denial: Denial) -> Self {
        Failure::Denied(denial)
    }
}

/// Login gate: external credential check, role allow-list, local user upsert
#[derive(Clone)]
pub struct AuthGate {
    provider: IdentityProvider,
    allowed_roles: Arc<HashSet<String>>,
    users: Arc<dyn UserStore>,
}

impl AuthGate {
    pub fn new(
        provider: IdentityProvider,
        allowed_roles: HashSet<String>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            provider,
            allowed_roles: Arc::new(allowed_roles),
            users,
        }
    }

    pub fn from_config(config: &IdentityConfig, users: Arc<dyn UserStore>) -> Result<Self, ProviderError> {
        let provider = IdentityProvider::new(
            config.login_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(provider, config.super_roles.clone(), users))
    }

    /// Authenticate against the identity provider.
    ///
    /// `Ok(None)` covers every refusal (bad credentials, provider down,
    /// expired or malformed token, role not allowed) so callers cannot tell
    /// them apart. `Err` is reserved for a provider answering 200 without an
    /// access token, and for the local user store failing.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<AdminUser>, AuthError> {
        match self.authorize(username, password).await {
            Ok(role) => {
                let user = self.users.get_or_create_by_email(username).await?;
                info!(user_id = %user.id, email = %user.email, role = %role, "Admin login accepted");
                Ok(Some(user))
            }
            Err(Failure::Denied(denial)) => {
                match &denial {
                    Denial::ProviderUnreachable(_) => warn!(username, reason = %denial, "Admin login denied"),
                    _ => info!(username, reason = %denial, "Admin login denied"),
                }
                Ok(None)
            }
            Err(Failure::Fatal(err)) => {
                warn!(username, error = %err, "Admin login failed");
                Err(err)
            }
        }
    }

    /// Resolve a previously authenticated user, e.g. from a session token
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, AuthError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Runs the decision steps in order and returns the accepted role
    async fn authorize(&self, username: &str, password: &str) -> Result<String, Failure> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(Denial::EmptyCredentials.into());
        }

        let access_token = match self.provider.login(username, password).await {
            Ok(token) => token,
            Err(ProviderError::Unreachable(e)) => {
                return Err(Denial::ProviderUnreachable(e.to_string()).into())
            }
            Err(ProviderError::Rejected(status)) => return Err(Denial::Rejected(status.as_u16()).into()),
            Err(ProviderError::Contract(msg)) => {
                return Err(Failure::Fatal(AuthError::ProviderContract(msg)))
            }
        };

        let claims = decode_unverified(&access_token)
            .map_err(|e| Denial::BadToken(e.to_string()))?;

        match claims.role_name {
            Some(role) if self.allowed_roles.contains(&role) => Ok(role),
            other => Err(Denial::RoleNotAllowed(other).into()),
        }
    }
}

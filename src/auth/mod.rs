pub mod gate;
pub mod provider;
pub mod token;

pub use gate::{AuthError, AuthGate};
pub use provider::{IdentityProvider, ProviderError};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::AdminUser;

/// Claims of the session token this service issues after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user: &AdminUser, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::ExpiryOutOfRange(expiry_hours))?;

        Ok(Self {
            sub: user.id,
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }

    /// Seconds between issue and expiry
    pub fn lifetime_secs(&self) -> u64 {
        u64::try_from(self.exp - self.iat).unwrap_or(0)
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
    ExpiryOutOfRange(u64),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::ExpiryOutOfRange(hours) => write!(f, "Session expiry of {} hours is out of range", hours),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &SessionClaims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify a session token we issued (signature and expiry are checked)
pub fn validate_jwt(token: &str, secret: &str) -> Result<SessionClaims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<SessionClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_round_trip() {
        let user = AdminUser::new_privileged("ops@example.com");
        let token = generate_jwt(&SessionClaims::new(&user, 1).unwrap(), "secret").unwrap();

        let claims = validate_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "ops@example.com");
    }

    #[test]
    fn session_token_signed_with_other_secret_is_rejected() {
        let user = AdminUser::new_privileged("ops@example.com");
        let token = generate_jwt(&SessionClaims::new(&user, 1).unwrap(), "secret").unwrap();
        assert!(matches!(validate_jwt(&token, "other"), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn lifetime_matches_requested_hours() {
        let user = AdminUser::new_privileged("ops@example.com");
        let claims = SessionClaims::new(&user, 8).unwrap();
        assert_eq!(claims.lifetime_secs(), 8 * 3600);
    }

    #[test]
    fn absurd_expiry_is_an_error_not_a_panic() {
        let user = AdminUser::new_privileged("ops@example.com");
        for hours in [3_000_000_000_000_000, u64::MAX] {
            assert!(matches!(
                SessionClaims::new(&user, hours),
                Err(JwtError::ExpiryOutOfRange(h)) if h == hours
            ));
        }
    }

    #[test]
    fn empty_secret_is_refused() {
        let user = AdminUser::new_privileged("ops@example.com");
        assert!(matches!(
            generate_jwt(&SessionClaims::new(&user, 1).unwrap(), ""),
            Err(JwtError::InvalidSecret)
        ));
    }
}

// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::{generate_jwt, SessionClaims};
use crate::database::models::AdminUser;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Login credentials, accepted as JSON or as an HTML form post.
/// Missing fields, or a body in any other format, are read as empty and
/// refused by the gate like any other bad login.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[async_trait]
impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(credentials) = Json::<Credentials>::from_request(req, state)
                .await
                .map_err(|e| ApiError::invalid_json(e.body_text()))?;
            Ok(credentials)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(credentials) = Form::<Credentials>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(credentials)
        } else {
            tracing::debug!(content_type = %content_type, "Login body in unsupported format");
            Ok(Credentials::default())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminUser,
    pub expires_in: u64,
}

/// POST /auth/login - Authenticate through the identity provider
///
/// Success:
/// ```json
/// { "success": true, "data": { "token": "eyJ...", "user": { ... }, "expires_in": 86400 } }
/// ```
///
/// Every refusal answers `401 Invalid login` without saying why.
pub async fn login(State(state): State<AppState>, credentials: Credentials) -> ApiResult<LoginResponse> {
    let user = state
        .gate
        .authenticate(&credentials.username, &credentials.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid login"))?;

    let claims = SessionClaims::new(&user, state.config.security.jwt_expiry_hours)
        .map_err(|e| {
            tracing::error!("Failed to build session claims: {}", e);
            ApiError::internal_server_error("Failed to issue session token")
        })?;
    let token = generate_jwt(&claims, &state.config.security.secret_key).map_err(|e| {
        tracing::error!("Failed to issue session token: {}", e);
        ApiError::internal_server_error("Failed to issue session token")
    })?;

    Ok(ApiResponse::success(LoginResponse {
        token,
        user,
        expires_in: claims.lifetime_secs(),
    }))
}

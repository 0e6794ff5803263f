use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::AuthGate;
use crate::config::AppConfig;
use crate::database::{
    DatabaseManager, DbRouter, PgUserStore, ScheduleRepository, ScheduleStore, UserStore,
};
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::services::{AdminService, NotificationService, SchedulerClient};

/// Everything a request handler needs, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: AuthGate,
    pub databases: DatabaseManager,
    pub router: DbRouter,
    pub admin: AdminService,
    pub notifications: NotificationService,
}

impl AppState {
    /// Production wiring: admin users and schedules live in Postgres
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let databases = DatabaseManager::new(config.database.clone());
        let router = DbRouter::new();
        let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(databases.clone(), &router));
        let schedules: Arc<dyn ScheduleStore> =
            Arc::new(ScheduleRepository::new(databases.clone(), &router));
        Self::build(config, databases, router, users, schedules)
    }

    /// Same wiring with caller supplied stores
    pub fn with_stores(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        schedules: Arc<dyn ScheduleStore>,
    ) -> anyhow::Result<Self> {
        let databases = DatabaseManager::new(config.database.clone());
        Self::build(config, databases, DbRouter::new(), users, schedules)
    }

    fn build(
        config: AppConfig,
        databases: DatabaseManager,
        router: DbRouter,
        users: Arc<dyn UserStore>,
        schedules: Arc<dyn ScheduleStore>,
    ) -> anyhow::Result<Self> {
        let gate = AuthGate::from_config(&config.identity, users)?;
        let scheduler = SchedulerClient::from_config(&config.scheduler)?;
        let notifications = NotificationService::new(schedules, scheduler);
        let admin = AdminService::new(databases.clone(), router);

        Ok(Self {
            config: Arc::new(config),
            gate,
            databases,
            router,
            admin,
            notifications,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .with_state(state);

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let security = &config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new().route("/auth/login", post(auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{admin, auth, notification};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/admin/models", get(admin::models_list))
        .route("/api/admin/:model", get(admin::records_list))
        .route(
            "/api/admin/:model/:id",
            get(admin::record_get).delete(admin::record_delete),
        )
        .route("/api/notification/schedule", post(notification::schedule_post))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

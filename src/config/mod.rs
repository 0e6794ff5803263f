use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::env;

use crate::database::DbTarget;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Process-wide settings, built once at startup and shared through `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub identity: IdentityConfig,
    pub database: DatabaseConfig,
    pub scheduler: SchedulerConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub login_url: String,
    /// Role names granted admin privileges after a successful provider login
    pub super_roles: HashSet<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub targets: BTreeMap<String, ConnectionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub name: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            connection_timeout: 5,
            targets: BTreeMap::new(),
        }
    }
}

impl DatabaseConfig {
    pub fn target(&self, target: DbTarget) -> Option<&ConnectionConfig> {
        self.targets.get(target.as_str())
    }
}

impl SchedulerConfig {
    pub fn schedule_url(&self) -> String {
        format!("http://{}:{}/api/v1/schedule", self.host, self.port)
    }
}

/// Upper bound for `SECURITY_JWT_EXPIRY_HOURS` (one year)
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

/// Parse a comma separated role list, trimming entries and dropping blanks
pub fn parse_roles(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Identity provider
        if let Some(v) = lookup("AUTH_API_LOGIN_URL") {
            self.identity.login_url = v;
        }
        if let Some(v) = lookup("SUPER_ROLES_NAME") {
            self.identity.super_roles = parse_roles(&v);
        }
        if let Some(v) = lookup("AUTH_API_TIMEOUT_SECS") {
            self.identity.request_timeout_secs = parse_value("AUTH_API_TIMEOUT_SECS", &v)?;
        }

        // Pool settings shared by every target
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Per-target connection parameters: <PREFIX>_DB_{NAME,USER,PASSWORD,HOST,PORT}
        for target in DbTarget::ALL {
            let prefix = target.env_prefix();
            let var = |suffix: &str| lookup(&format!("{}_DB_{}", prefix, suffix));

            let port = match var("PORT") {
                Some(v) => parse_value(&format!("{}_DB_PORT", prefix), &v)?,
                None => target.default_port(),
            };

            let connection = ConnectionConfig {
                name: var("NAME").unwrap_or_else(|| target.as_str().to_string()),
                user: var("USER").unwrap_or_else(|| "postgres".to_string()),
                password: var("PASSWORD").unwrap_or_default(),
                host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port,
            };
            self.database.targets.insert(target.as_str().to_string(), connection);
        }

        // Scheduler
        if let Some(v) = lookup("SCHEDULE_HOST") {
            self.scheduler.host = v;
        }
        if let Some(v) = lookup("SCHEDULE_PORT") {
            self.scheduler.port = parse_value("SCHEDULE_PORT", &v)?;
        }

        // API
        if let Some(v) = lookup("ADMIN_PANEL_PORT").or_else(|| lookup("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security
        if let Some(v) = lookup("BACKEND_SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = parse_value("SECURITY_JWT_EXPIRY_HOURS", &v)?;
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.login_url.is_empty() {
            return Err(ConfigError::Missing("AUTH_API_LOGIN_URL".to_string()));
        }
        if self.identity.super_roles.is_empty() {
            return Err(ConfigError::Missing("SUPER_ROLES_NAME".to_string()));
        }
        if self.security.secret_key.is_empty() {
            return Err(ConfigError::Missing("BACKEND_SECRET_KEY".to_string()));
        }
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&self.security.jwt_expiry_hours) {
            return Err(ConfigError::Invalid {
                key: "SECURITY_JWT_EXPIRY_HOURS".to_string(),
                value: self.security.jwt_expiry_hours.to_string(),
            });
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            identity: IdentityConfig {
                login_url: String::new(),
                super_roles: HashSet::new(),
                request_timeout_secs: 10,
            },
            database: DatabaseConfig::default(),
            scheduler: SchedulerConfig {
                host: "127.0.0.1".to_string(),
                port: 8001,
            },
            api: ApiConfig {
                port: 8000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                secret_key: "development-only-secret".to_string(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 10,
                targets: BTreeMap::new(),
            },
            security: SecurityConfig {
                secret_key: String::new(),
                jwt_expiry_hours: 12,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 5,
                targets: BTreeMap::new(),
            },
            api: ApiConfig {
                port: 8000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                secret_key: String::new(),
                jwt_expiry_hours: 8,
                enable_cors: false,
                cors_origins: Vec::new(),
            },
            ..Self::development()
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("AUTH_API_LOGIN_URL", "http://auth:8000/api/v1/auth/login"),
            ("SUPER_ROLES_NAME", "admin, content_manager ,,"),
        ]
    }

    #[test]
    fn parses_role_list_with_trimming() {
        let roles = parse_roles(" admin,content_manager , ,editor");
        assert_eq!(roles.len(), 3);
        assert!(roles.contains("admin"));
        assert!(roles.contains("content_manager"));
        assert!(roles.contains("editor"));
    }

    #[test]
    fn development_config_from_minimal_source() {
        let config = AppConfig::from_source(source(&minimal())).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.identity.super_roles.len(), 2);
        assert_eq!(config.identity.request_timeout_secs, 10);

        let movie = config.database.target(DbTarget::Movie).unwrap();
        assert_eq!(movie.port, 5434);
        assert_eq!(movie.host, "127.0.0.1");
        assert_eq!(config.database.targets.len(), DbTarget::ALL.len());
    }

    #[test]
    fn per_target_overrides() {
        let mut pairs = minimal();
        pairs.push(("AUTH_DB_NAME", "auth_database"));
        pairs.push(("AUTH_DB_HOST", "db.internal"));
        pairs.push(("AUTH_DB_PORT", "6543"));
        let config = AppConfig::from_source(source(&pairs)).unwrap();

        let auth = config.database.target(DbTarget::Auth).unwrap();
        assert_eq!(auth.name, "auth_database");
        assert_eq!(auth.host, "db.internal");
        assert_eq!(auth.port, 6543);
    }

    #[test]
    fn missing_login_url_is_an_error() {
        let err = AppConfig::from_source(source(&[("SUPER_ROLES_NAME", "admin")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == "AUTH_API_LOGIN_URL"));
    }

    #[test]
    fn production_requires_secret_key() {
        let mut pairs = minimal();
        pairs.push(("APP_ENV", "production"));
        let err = AppConfig::from_source(source(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == "BACKEND_SECRET_KEY"));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let mut pairs = minimal();
        pairs.push(("SCHEDULE_PORT", "eighty"));
        assert!(matches!(
            AppConfig::from_source(source(&pairs)),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn session_expiry_is_bounded() {
        for hours in ["0", "3000000000000000", "8761"] {
            let mut pairs = minimal();
            pairs.push(("SECURITY_JWT_EXPIRY_HOURS", hours));
            assert!(
                matches!(
                    AppConfig::from_source(source(&pairs)),
                    Err(ConfigError::Invalid { ref key, .. }) if key == "SECURITY_JWT_EXPIRY_HOURS"
                ),
                "{} hours accepted",
                hours
            );
        }

        let mut pairs = minimal();
        pairs.push(("SECURITY_JWT_EXPIRY_HOURS", "8760"));
        let config = AppConfig::from_source(source(&pairs)).unwrap();
        assert_eq!(config.security.jwt_expiry_hours, MAX_JWT_EXPIRY_HOURS);
    }

    #[test]
    fn scheduler_url_uses_host_and_port() {
        let mut pairs = minimal();
        pairs.push(("SCHEDULE_HOST", "scheduler"));
        pairs.push(("SCHEDULE_PORT", "8080"));
        let config = AppConfig::from_source(source(&pairs)).unwrap();
        assert_eq!(config.scheduler.schedule_url(), "http://scheduler:8080/api/v1/schedule");
    }
}

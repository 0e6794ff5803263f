use std::io::BufRead;
use std::sync::Arc;

use serde_json::json;

use crate::auth::AuthGate;
use crate::cli::utils::{fail, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, DbRouter, PgUserStore, UserStore};

/// Run the full login against the configured provider and user store
pub async fn handle(
    username: &str,
    password: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let databases = DatabaseManager::new(config.database.clone());
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(databases.clone(), &DbRouter::new()));
    let gate = AuthGate::from_config(&config.identity, users)?;

    let outcome = gate.authenticate(username, &password).await;
    databases.close_all().await;

    match outcome? {
        Some(user) => output_success(
            &output_format,
            &format!("Logged in as {}", user.email),
            Some(json!({ "user": user })),
        ),
        None => Err(fail(&output_format, "Invalid login", "LOGIN_DENIED")),
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

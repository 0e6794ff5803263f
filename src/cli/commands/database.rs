use serde_json::json;

use crate::cli::utils::{fail, output_rows, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::router::ADMINISTRATOR_NAMESPACE;
use crate::database::{DatabaseManager, DbRouter, DbTarget, PgUserStore};

pub async fn health(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let databases = DatabaseManager::new(config.database);

    let results = databases.health_check().await;
    databases.close_all().await;

    let failures = results.iter().filter(|(_, result)| result.is_err()).count();
    let rows = results
        .into_iter()
        .map(|(target, result)| match result {
            Ok(()) => json!({ "database": target, "status": "ok" }),
            Err(e) => json!({ "database": target, "status": "unavailable", "error": e.to_string() }),
        })
        .collect();

    output_rows(&output_format, "databases", rows, |row| {
        let mut line = format!(
            "{:<14} {}",
            row["database"].as_str().unwrap_or_default(),
            row["status"].as_str().unwrap_or_default()
        );
        if let Some(error) = row["error"].as_str() {
            line.push_str(&format!(" ({})", error));
        }
        line
    })?;

    if failures > 0 {
        return Err(anyhow::anyhow!("{} database(s) unavailable", failures));
    }
    Ok(())
}

pub async fn bootstrap(database: DbTarget, output_format: OutputFormat) -> anyhow::Result<()> {
    let router = DbRouter::new();
    if router.should_migrate(database, ADMINISTRATOR_NAMESPACE) != Some(true) {
        let message = format!(
            "Admin user table does not belong on database '{}' (owner: {})",
            database,
            router.resolve(ADMINISTRATOR_NAMESPACE)
        );
        return Err(fail(&output_format, &message, "WRONG_DATABASE"));
    }

    let config = AppConfig::from_env()?;
    let databases = DatabaseManager::new(config.database);
    let pool = databases.pool(database).await?;
    let created = PgUserStore::ensure_schema(&pool).await;
    databases.close_all().await;
    created?;

    output_success(
        &output_format,
        &format!("Admin user table ready on database '{}'", database),
        Some(json!({ "database": database })),
    )
}

use serde_json::{json, Value};

use crate::cli::utils::{output_rows, output_success, target_label};
use crate::cli::OutputFormat;
use crate::config::DatabaseConfig;
use crate::database::{DatabaseManager, DbRouter, DbTarget, RelationRule};
use crate::services::AdminService;

/// Read/write targets for one namespace plus the databases it migrates on
pub fn route_summary(router: &DbRouter, namespace: &str) -> Value {
    let migrates_on: Vec<DbTarget> = DbTarget::ALL
        .iter()
        .copied()
        .filter(|db| router.should_migrate(*db, namespace) == Some(true))
        .collect();

    json!({
        "namespace": namespace,
        "read": router.choose_for_read(namespace),
        "write": router.choose_for_write(namespace),
        "migrates_on": migrates_on,
    })
}

pub fn route(namespace: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let summary = route_summary(&DbRouter::new(), namespace);

    match output_format {
        OutputFormat::Json => output_success(&output_format, "Route resolved", Some(summary)),
        OutputFormat::Text => {
            println!("Namespace: {}", namespace);
            println!("Read:      {}", target_label(&summary["read"]));
            println!("Write:     {}", target_label(&summary["write"]));
            if summary["read"].is_null() {
                println!("Undecided namespaces fall back to the default database");
            }
            Ok(())
        }
    }
}

pub fn relation(a: &str, b: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let rule = DbRouter::new().allow_relation(a, b);
    let message = match rule {
        RelationRule::Permitted => format!("Relation {} <-> {} permitted", a, b),
        RelationRule::Undecided => format!("Relation {} <-> {} undecided", a, b),
    };

    output_success(
        &output_format,
        &message,
        Some(json!({ "a": a, "b": b, "permitted": rule == RelationRule::Permitted })),
    )
}

pub fn models(output_format: OutputFormat) -> anyhow::Result<()> {
    // Routing needs no live pool; the manager stays empty
    let databases = DatabaseManager::new(DatabaseConfig::default());
    let service = AdminService::new(databases, DbRouter::new());

    let rows = service
        .models()
        .into_iter()
        .map(|route| serde_json::to_value(route))
        .collect::<Result<Vec<_>, _>>()?;

    output_rows(&output_format, "models", rows, |row| {
        format!(
            "{:<40} {:<30} {}",
            row["model"].as_str().unwrap_or_default(),
            row["table"].as_str().unwrap_or_default(),
            target_label(&row["write"]),
        )
    })
}

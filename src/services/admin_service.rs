use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::database::registry::{self, ModelMeta, MODELS};
use crate::database::{DatabaseError, DatabaseManager, DbRouter, DbTarget};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// A registered model together with the database the router places it in
#[derive(Debug, Clone, Serialize)]
pub struct ModelRoute {
    pub model: String,
    pub table: &'static str,
    pub read: DbTarget,
    pub write: DbTarget,
}

/// Generic record access for registered admin models. Every query picks its
/// pool through the router, falling back to `default` when undecided.
#[derive(Clone)]
pub struct AdminService {
    databases: DatabaseManager,
    router: DbRouter,
}

pub const MAX_PAGE_SIZE: i64 = 500;

impl AdminService {
    pub fn new(databases: DatabaseManager, router: DbRouter) -> Self {
        Self { databases, router }
    }

    pub fn models(&self) -> Vec<ModelRoute> {
        MODELS.iter().map(|model| self.describe(model)).collect()
    }

    pub fn describe(&self, model: &ModelMeta) -> ModelRoute {
        ModelRoute {
            model: model.key(),
            table: model.table,
            read: self.read_target(model),
            write: self.write_target(model),
        }
    }

    fn lookup(&self, key: &str) -> Result<&'static ModelMeta, AdminError> {
        registry::find(key).ok_or_else(|| AdminError::UnknownModel(key.to_string()))
    }

    fn read_target(&self, model: &ModelMeta) -> DbTarget {
        self.router
            .choose_for_read(model.namespace)
            .unwrap_or(DbTarget::Default)
    }

    fn write_target(&self, model: &ModelMeta) -> DbTarget {
        self.router
            .choose_for_write(model.namespace)
            .unwrap_or(DbTarget::Default)
    }

    /// Page through a model's rows, each returned as a JSON object
    pub async fn list(&self, key: &str, limit: i64, offset: i64) -> Result<Vec<Value>, AdminError> {
        let model = self.lookup(key)?;
        let target = self.read_target(model);
        let pool = self.databases.pool(target).await?;

        let query = format!(
            "SELECT row_to_json(t) FROM {} t LIMIT $1 OFFSET $2",
            model.quoted_table()
        );
        debug!(model = %model.key(), %target, "Listing records");

        let rows: Vec<(Value,)> = sqlx::query_as(&query)
            .bind(limit.clamp(1, MAX_PAGE_SIZE))
            .bind(offset.max(0))
            .fetch_all(&pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(target, e))?;

        Ok(rows.into_iter().map(|(record,)| record).collect())
    }

    pub async fn get(&self, key: &str, id: &str) -> Result<Option<Value>, AdminError> {
        let model = self.lookup(key)?;
        let target = self.read_target(model);
        let pool = self.databases.pool(target).await?;

        let query = format!(
            "SELECT row_to_json(t) FROM {} t WHERE t.id::text = $1",
            model.quoted_table()
        );

        let row: Option<(Value,)> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(target, e))?;

        Ok(row.map(|(record,)| record))
    }

    /// Returns whether a row was removed
    pub async fn delete(&self, key: &str, id: &str) -> Result<bool, AdminError> {
        let model = self.lookup(key)?;
        let target = self.write_target(model);
        let pool = self.databases.pool(target).await?;

        let query = format!("DELETE FROM {} WHERE id::text = $1", model.quoted_table());
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(target, e))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(model = %model.key(), id, %target, "Record deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    fn service() -> AdminService {
        let databases = DatabaseManager::new(DatabaseConfig {
            max_connections: 1,
            connection_timeout: 1,
            targets: Default::default(),
        });
        AdminService::new(databases, DbRouter::new())
    }

    #[test]
    fn describes_every_registered_model() {
        let models = service().models();
        assert_eq!(models.len(), MODELS.len());

        let film = models.iter().find(|m| m.model == "movie.film_work").unwrap();
        assert_eq!(film.read, DbTarget::Movie);
        assert_eq!(film.write, DbTarget::Movie);

        let bookmark = models.iter().find(|m| m.model == "user_profile.bookmark").unwrap();
        assert_eq!(bookmark.read, DbTarget::Profile);
    }

    #[tokio::test]
    async fn unknown_model_is_reported() {
        let err = service().list("movie.nothing", 10, 0).await.unwrap_err();
        assert!(matches!(err, AdminError::UnknownModel(key) if key == "movie.nothing"));
    }
}

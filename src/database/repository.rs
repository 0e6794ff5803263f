use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{AdminUser, Schedule};
use super::router::{DbRouter, ADMINISTRATOR_NAMESPACE, NOTIFICATION_NAMESPACE};
use super::target::DbTarget;

/// Persistence seam for local admin users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return the user for `email`, creating a privileged one if none exists.
    /// Must be a single atomic operation keyed by the unique email.
    async fn get_or_create_by_email(&self, email: &str) -> Result<AdminUser, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, DatabaseError>;
}

/// Postgres-backed store for `administrator_user`, placed by the router
pub struct PgUserStore {
    databases: DatabaseManager,
    target: DbTarget,
}

const USER_COLUMNS: &str = "id, email, is_staff, is_superuser, created_at, last_login";

impl PgUserStore {
    pub fn new(databases: DatabaseManager, router: &DbRouter) -> Self {
        Self {
            databases,
            target: router.resolve(ADMINISTRATOR_NAMESPACE),
        }
    }

    async fn pool(&self) -> Result<PgPool, DatabaseError> {
        self.databases.pool(self.target).await
    }

    /// Create the admin user table if it does not exist yet
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS administrator_user (
                id UUID PRIMARY KEY,
                email VARCHAR(255) NOT NULL UNIQUE,
                password VARCHAR(128) NOT NULL DEFAULT '',
                is_staff BOOLEAN NOT NULL DEFAULT TRUE,
                is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_login TIMESTAMPTZ
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_or_create_by_email(&self, email: &str) -> Result<AdminUser, DatabaseError> {
        let pool = self.pool().await?;
        let fresh = AdminUser::new_privileged(email);

        // The no-op DO UPDATE makes RETURNING yield the existing row on conflict,
        // so concurrent first logins converge on one record without a pre-check.
        let query = format!(
            r#"
            INSERT INTO administrator_user (id, email, is_staff, is_superuser, created_at, last_login)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE SET last_login = EXCLUDED.last_login
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, AdminUser>(&query)
            .bind(fresh.id)
            .bind(&fresh.email)
            .bind(fresh.is_staff)
            .bind(fresh.is_superuser)
            .bind(fresh.created_at)
            .bind(Utc::now())
            .fetch_one(&pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(self.target, e))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, DatabaseError> {
        let pool = self.pool().await?;
        let query = format!("SELECT {} FROM administrator_user WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, AdminUser>(&query)
            .bind(id)
            .fetch_optional(&pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(self.target, e))
    }
}

/// In-process store keyed by email, for tests and local runs without Postgres
#[derive(Default, Clone)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, AdminUser>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_or_create_by_email(&self, email: &str) -> Result<AdminUser, DatabaseError> {
        // Single write lock covers lookup and insert
        let mut users = self.users.write().await;
        let user = users
            .entry(email.to_string())
            .or_insert_with(|| AdminUser::new_privileged(email));
        user.last_login = Some(Utc::now());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUser>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.id == id).cloned())
    }
}

/// Persistence seam for notification schedules
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Database the schedules land in
    fn target(&self) -> DbTarget;

    /// Insert or replace the schedule row by id
    async fn upsert(&self, schedule: &Schedule) -> Result<(), DatabaseError>;
}

/// Writes notification schedules to the database owning the notification namespace
pub struct ScheduleRepository {
    databases: DatabaseManager,
    target: DbTarget,
}

impl ScheduleRepository {
    pub fn new(databases: DatabaseManager, router: &DbRouter) -> Self {
        Self {
            databases,
            target: router.resolve(NOTIFICATION_NAMESPACE),
        }
    }
}

#[async_trait]
impl ScheduleStore for ScheduleRepository {
    fn target(&self) -> DbTarget {
        self.target
    }

    async fn upsert(&self, schedule: &Schedule) -> Result<(), DatabaseError> {
        let pool = self.databases.pool(self.target).await?;
        let lists = schedule.rule_lists().map(|(_, values)| {
            if values.is_empty() {
                None
            } else {
                Some(values.clone())
            }
        });

        let [bysetpos, bymonth, bymonthday, byyearday, byeaster, byweekno, byhour, byminute, bysecond] =
            lists;

        sqlx::query(
            r#"
            INSERT INTO notifications.schedule (
                id, notification_id, freq, dtstart, interval, wkst, count, until,
                bysetpos, bymonth, bymonthday, byyearday, byeaster, byweekno,
                byhour, byminute, bysecond
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (id) DO UPDATE SET
                notification_id = EXCLUDED.notification_id,
                freq = EXCLUDED.freq,
                dtstart = EXCLUDED.dtstart,
                interval = EXCLUDED.interval,
                wkst = EXCLUDED.wkst,
                count = EXCLUDED.count,
                until = EXCLUDED.until,
                bysetpos = EXCLUDED.bysetpos,
                bymonth = EXCLUDED.bymonth,
                bymonthday = EXCLUDED.bymonthday,
                byyearday = EXCLUDED.byyearday,
                byeaster = EXCLUDED.byeaster,
                byweekno = EXCLUDED.byweekno,
                byhour = EXCLUDED.byhour,
                byminute = EXCLUDED.byminute,
                bysecond = EXCLUDED.bysecond
            "#,
        )
        .bind(schedule.id)
        .bind(schedule.notification_id)
        .bind(schedule.freq.map(|f| f.as_str()))
        .bind(schedule.dtstart)
        .bind(schedule.interval)
        .bind(&schedule.wkst)
        .bind(schedule.count)
        .bind(schedule.until)
        .bind(bysetpos)
        .bind(bymonth)
        .bind(bymonthday)
        .bind(byyearday)
        .bind(byeaster)
        .bind(byweekno)
        .bind(byhour)
        .bind(byminute)
        .bind(bysecond)
        .execute(&pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(self.target, e))?;

        Ok(())
    }
}

/// In-process schedule table keyed by id
#[derive(Default, Clone)]
pub struct MemoryScheduleStore {
    schedules: Arc<RwLock<HashMap<Uuid, Schedule>>>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: Uuid) -> Option<Schedule> {
        self.schedules.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.schedules.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.schedules.read().await.is_empty()
    }
}

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    fn target(&self) -> DbTarget {
        DbTarget::Notification
    }

    async fn upsert(&self, schedule: &Schedule) -> Result<(), DatabaseError> {
        self.schedules
            .write()
            .await
            .insert(schedule.id, schedule.clone());
        Ok(())
    }
}

use std::sync::Arc;
use tracing::info;

use super::scheduler::{SchedulerClient, SchedulerError};
use crate::database::models::Schedule;
use crate::database::{DatabaseError, ScheduleStore};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleSaveError {
    /// Nothing was stored
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The row is stored but the scheduler did not accept it
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Saving a schedule stores it, then hands it to the scheduler service
#[derive(Clone)]
pub struct NotificationService {
    schedules: Arc<dyn ScheduleStore>,
    scheduler: SchedulerClient,
}

impl NotificationService {
    pub fn new(schedules: Arc<dyn ScheduleStore>, scheduler: SchedulerClient) -> Self {
        Self {
            schedules,
            scheduler,
        }
    }

    pub async fn save_schedule(&self, schedule: &Schedule) -> Result<(), ScheduleSaveError> {
        self.schedules.upsert(schedule).await?;
        info!(
            schedule_id = %schedule.id,
            target = %self.schedules.target(),
            "Schedule saved"
        );

        self.scheduler.send_schedule(schedule).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryScheduleStore;
    use httpmock::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn schedule() -> Schedule {
        serde_json::from_value(json!({
            "notification_id": Uuid::new_v4(),
            "byminute": [0, 30],
        }))
        .unwrap()
    }

    fn service(store: &MemoryScheduleStore, scheduler_url: String) -> NotificationService {
        NotificationService::new(
            Arc::new(store.clone()),
            SchedulerClient::new(scheduler_url).unwrap(),
        )
    }

    #[tokio::test]
    async fn accepted_schedule_is_stored_and_forwarded() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/schedule");
                then.status(201);
            })
            .await;

        let store = MemoryScheduleStore::new();
        let schedule = schedule();
        service(&store, server.url("/api/v1/schedule"))
            .save_schedule(&schedule)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(store.get(schedule.id).await, Some(schedule));
    }

    #[tokio::test]
    async fn rejected_schedule_stays_stored() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/schedule");
                then.status(400).body("bad rule");
            })
            .await;

        let store = MemoryScheduleStore::new();
        let schedule = schedule();
        let err = service(&store, server.url("/api/v1/schedule"))
            .save_schedule(&schedule)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScheduleSaveError::Scheduler(SchedulerError::Rejected { ref body, .. }) if body == "bad rule"
        ));
        assert_eq!(store.get(schedule.id).await, Some(schedule));
    }

    #[tokio::test]
    async fn unreachable_scheduler_keeps_the_row() {
        let store = MemoryScheduleStore::new();
        let schedule = schedule();
        let err = service(&store, "http://127.0.0.1:9/api/v1/schedule".to_string())
            .save_schedule(&schedule)
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleSaveError::Scheduler(SchedulerError::Unavailable(_))));
        assert_eq!(store.len().await, 1);
    }
}

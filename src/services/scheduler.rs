use reqwest::{header::CONTENT_TYPE, StatusCode};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::SchedulerConfig;
use crate::database::models::Schedule;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Scheduler service is not available")]
    Unavailable(#[source] reqwest::Error),

    #[error("Scheduler service connection error (status {status})")]
    Rejected { status: StatusCode, body: String },
}

/// Pushes saved schedules to the notification scheduler service
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    client: reqwest::Client,
    url: String,
}

impl SchedulerClient {
    pub fn new(url: impl Into<String>) -> Result<Self, SchedulerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(SchedulerError::Unavailable)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        Self::new(config.schedule_url())
    }

    /// POST the schedule; the scheduler answers `201 Created` on success
    pub async fn send_schedule(&self, schedule: &Schedule) -> Result<(), SchedulerError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(schedule.scheduler_payload().to_string())
            .send()
            .await
            .map_err(|e| {
                warn!("Scheduler unreachable: {}", e);
                SchedulerError::Unavailable(e)
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Scheduler refused schedule {}", schedule.id);
            return Err(SchedulerError::Rejected { status, body });
        }

        info!(%status, "Schedule {} delivered to scheduler", schedule.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn schedule() -> Schedule {
        serde_json::from_value(json!({
            "notification_id": Uuid::new_v4(),
            "freq": "Daily",
            "byhour": [10],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn created_is_success() {
        let server = MockServer::start_async().await;
        let schedule = schedule();
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/schedule")
                    .header("content-type", "application/json; charset=utf-8")
                    .json_body(schedule.scheduler_payload());
                then.status(201);
            })
            .await;

        let client = SchedulerClient::new(server.url("/api/v1/schedule")).unwrap();
        client.send_schedule(&schedule).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn other_status_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/schedule");
                then.status(200).json_body(json!({"detail": "duplicate"}));
            })
            .await;

        let client = SchedulerClient::new(server.url("/api/v1/schedule")).unwrap();
        let err = client.send_schedule(&schedule()).await.unwrap_err();
        match err {
            SchedulerError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::OK);
                assert!(body.contains("duplicate"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_unavailable() {
        let client = SchedulerClient::new("http://127.0.0.1:9/api/v1/schedule").unwrap();
        let err = client.send_schedule(&schedule()).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Unavailable(_)));
    }
}

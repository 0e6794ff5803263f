pub mod admin_service;
pub mod notification_service;
pub mod scheduler;

pub use admin_service::{AdminError, AdminService, ModelRoute};
pub use notification_service::{NotificationService, ScheduleSaveError};
pub use scheduler::{SchedulerClient, SchedulerError};

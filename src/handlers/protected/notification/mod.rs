// handlers/protected/notification/mod.rs - Notification handlers
pub mod schedule; // POST /api/notification/schedule

pub use schedule::schedule_post;

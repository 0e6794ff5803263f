pub mod schedule;
pub mod user;

pub use schedule::{Frequency, Schedule};
pub use user::AdminUser;

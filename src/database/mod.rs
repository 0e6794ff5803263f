pub mod manager;
pub mod models;
pub mod registry;
pub mod repository;
pub mod router;
pub mod target;

pub use manager::{DatabaseError, DatabaseManager};
pub use registry::ModelMeta;
pub use repository::{
    MemoryScheduleStore, MemoryUserStore, PgUserStore, ScheduleRepository, ScheduleStore, UserStore,
};
pub use router::{DbRouter, RelationRule};
pub use target::DbTarget;

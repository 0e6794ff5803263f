// handlers/protected/admin/mod.rs - Registered model handlers
//
// Every handler resolves its database through the router; an unreachable
// database answers 503 with the target name.
pub mod models;  // GET /api/admin/models
pub mod records; // GET /api/admin/:model, GET|DELETE /api/admin/:model/:id

pub use models::models_list;
pub use records::{record_delete, record_get, records_list};

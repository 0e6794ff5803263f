// handlers/protected/auth/mod.rs - Session handlers
pub mod whoami; // GET /api/auth/whoami

pub use whoami::whoami;

// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition only. Everything else lives under /api and needs a
// session token.
pub mod auth;

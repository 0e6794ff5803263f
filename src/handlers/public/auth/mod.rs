// handlers/public/auth/mod.rs - Public authentication handlers
pub mod login; // POST /auth/login - external credential check, session token

pub use login::login;

// handlers/protected/mod.rs - Protected handlers (session JWT required)
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware injects AuthUser into request extensions
pub mod admin;        // Registered model records, routed per namespace
pub mod auth;         // Session introspection
pub mod notification; // Notification schedules

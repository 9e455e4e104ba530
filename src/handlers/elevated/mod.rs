// handlers/elevated/mod.rs - Elevated handlers
//
// Security Level: RequireAuthenticated then RequireAdmin
// Route Prefix: /admin/*, plus event writes under /events

pub mod admin;
pub mod events;

// handlers/public/mod.rs - Public handlers
//
// Security Level: none, or OptionalAuthenticate on GET /events/:id
// Route Prefix: /auth/*, /events, /q_and_a, /health

pub mod auth;
pub mod events;
pub mod q_and_a;
pub mod system;

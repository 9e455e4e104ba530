// handlers/mod.rs - Handlers grouped by security tier
//
// Public (no credential or optional credential) → Protected (valid credential)
// → Elevated (admin credential). The guards for each tier are attached in
// app.rs at route registration time.

pub mod elevated;
pub mod protected;
pub mod public;

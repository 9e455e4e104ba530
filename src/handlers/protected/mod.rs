// handlers/protected/mod.rs - Protected handlers
//
// Security Level: RequireAuthenticated, plus RequireSelfOrAdmin on /users/:id
// Handlers read the verified caller through `Extension<Identity>`.

pub mod feedback;
pub mod q_and_a;
pub mod registrations;
pub mod users;

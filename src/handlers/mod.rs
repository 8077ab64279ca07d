// handlers/mod.rs - route handlers grouped by access tier
//
// Public (no auth) → Protected (bearer JWT, resolved to an AuthUser)

pub mod public;
pub mod protected;

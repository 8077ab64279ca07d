// handlers/public/mod.rs - endpoints reachable without a token

pub mod auth;
pub mod health;

pub use health::{health, not_found, root};

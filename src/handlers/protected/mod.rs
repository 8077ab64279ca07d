// handlers/protected/mod.rs - endpoints behind jwt_auth_middleware
//
// Every handler here receives the authenticated `AuthUser` as a request
// extension and passes its id down as the owner scope.

pub mod account;
pub mod expenses;

pub mod auth;
pub mod guard;

pub use auth::basic_auth_middleware;
pub use guard::{guard_middleware, GuardChain};

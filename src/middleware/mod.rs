pub mod auth;

pub use auth::actor_context_middleware;

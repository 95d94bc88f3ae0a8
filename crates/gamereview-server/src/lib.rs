//! HTTP surface of the gamereview backend.
//!
//! The router is built from an [`AppState`] so tests can drive it with
//! in-memory collaborators; [`server::run`] wires it to Postgres.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

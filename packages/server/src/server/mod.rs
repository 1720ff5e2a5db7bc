// HTTP server setup (Axum)
pub mod app;
pub mod auth;
pub mod routes;

pub use app::*;

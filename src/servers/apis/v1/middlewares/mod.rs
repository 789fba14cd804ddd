//! API middlewares. See [Axum middlewares](axum::middleware).
pub mod auth;

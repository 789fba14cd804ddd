//! API context: `health_check`.
//!
//! A liveness probe for process supervisors and containers. It is the only
//! endpoint that does not require the API key.
//!
//! # Endpoints
//!
//! - [Health check](#health-check)
//!
//! # Health check
//!
//! `GET /health_check`
//!
//! **Example request**
//!
//! ```bash
//! curl "http://127.0.0.1:1010/api/health_check"
//! ```
//!
//! **Example response** `200`
//!
//! ```json
//! {"status": "Ok"}
//! ```
pub mod handlers;
pub mod resources;

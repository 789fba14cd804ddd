//! The first version of the HTTP API.
//!
//! It is split in [contexts](crate::servers::apis::v1::context), one per
//! group of related endpoints.
pub mod context;
pub mod middlewares;
pub mod resources;
pub mod responses;
pub mod routes;

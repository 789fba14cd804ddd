//! Application bootstrapping.
//!
//! This module includes all the functions to build the application, its
//! dependencies, and run the jobs.
//!
//! Jobs are tasks executed concurrently: the HTTP API, the recovery of the
//! stored transfers and the throughput sampler.
pub mod app;
pub mod config;
pub mod jobs;
pub mod logging;

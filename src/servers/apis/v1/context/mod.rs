//! API is organized in resource groups called contexts.
//!
//! Each context is a module that contains the API endpoints related to a
//! specific resource group.
pub mod file;
pub mod health_check;
pub mod play;
pub mod torrent;

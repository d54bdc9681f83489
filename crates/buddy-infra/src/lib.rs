//! Infrastructure layer for Buddy.
//!
//! Contains implementations of the ports defined in `buddy-core`: the REST
//! submission client, configuration loading, and filesystem inputs.

pub mod config;
pub mod filesystem;
pub mod http;

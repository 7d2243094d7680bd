//! `pacserver`: resolves Proxy Auto-Configuration files by longest-prefix
//! match on the requester's IPv4 address.
//!
//! The binary entrypoint (`main.rs`) is a thin wrapper around
//! [`app_context::AppContext`]; everything else lives here so it can be
//! exercised directly from `pacserver-tests`.

pub mod app_context;
pub mod core;
pub mod logging;
pub mod server;

pub use app_context::AppContext;
pub use core::Cache;

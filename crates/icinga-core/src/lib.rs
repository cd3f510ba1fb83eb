//! Icinga 2 API client
//!
//! - Objects, actions and status over the REST API
//! - Event stream subscriptions with incremental record reassembly
//! - Certificate or basic-auth sessions, configured directly or from a file

pub mod actions;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod objects;
pub mod status;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ApiError, Result};

/// Library version, sent in the User-Agent header
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

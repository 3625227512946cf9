//! GitHub-backed plugin discovery.
//!
//! Populates the "browse plugins" UI: topic search against the GitHub
//! repository index and raw README fetches. Discovery never installs or
//! enables anything on its own.

pub mod client;
pub mod types;

pub use client::{HubClient, SearchTicket, README_NOT_FOUND};
pub use types::{GitHubPluginSummary, TrustLevel};

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::uninlined_format_args
)]

//! Plugin subsystem of the EDBP block editor: lifecycle management of
//! installed extensions, GitHub-backed discovery, and zip installation.
//! The editor shell owns all rendering; it drives this crate through
//! [`PluginManager`] and implements [`host::WorkspaceHost`] against its
//! block workspace.

pub mod builtin;
pub mod error;
pub mod host;
pub mod hub;
pub mod install;
pub mod manager;
pub mod plugin;
pub mod registry;
pub mod store;

pub use error::PluginError;
pub use manager::PluginManager;
pub use registry::{PluginDescriptor, PluginRegistry};

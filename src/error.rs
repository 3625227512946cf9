//! Failure taxonomy for the plugin subsystem.

use crate::install::InstallError;

/// Errors surfaced by lifecycle, discovery, and installation operations.
///
/// Unknown plugin ids on enable/disable are deliberately *not* represented
/// here: those requests are logged and become no-ops so stale persisted ids
/// never break startup.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// A plugin id that no descriptor in the registry matches.
    #[error("unknown plugin id '{0}'")]
    NotFound(String),

    /// Archive installation failed (malformed zip, missing manifest, ...).
    #[error("install error: {0}")]
    Install(#[from] InstallError),

    /// Discovery search or README fetch could not reach the remote index.
    #[error("network error: {0}")]
    Network(String),

    /// The host workspace API is unavailable or rejected an integration call.
    #[error("host integration error: {0}")]
    HostIntegration(String),

    /// A plugin's load hook failed; the manager rolled back partial effects.
    #[error("plugin '{id}' failed to load: {message}")]
    Load { id: String, message: String },
}

pub type Result<T> = std::result::Result<T, PluginError>;

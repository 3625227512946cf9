//! Plugin trait and the id → implementation factory map.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::builtin::{CustomBlockPlugin, StylePlugin, VanillaPlugin};
use crate::host::WorkspaceHost;

/// A runtime plugin instance bound 1:1 to an enabled plugin id.
///
/// `on_load` applies the plugin's side effects to the host workspace and
/// may suspend for asynchronous setup. `on_unload` must reverse exactly
/// what `on_load` applied and must be idempotent when nothing was applied.
#[async_trait]
pub trait Plugin: Send + Sync {
    async fn on_load(&mut self, host: &dyn WorkspaceHost) -> Result<()>;
    async fn on_unload(&mut self, host: &dyn WorkspaceHost) -> Result<()>;
}

pub type PluginBuilder = Box<dyn Fn() -> Box<dyn Plugin> + Send + Sync>;

/// Registered-factory map from plugin id to instance builder.
///
/// Adding a plugin implementation means registering a builder here, not
/// editing a central conditional.
#[derive(Default)]
pub struct PluginFactory {
    builders: HashMap<String, PluginBuilder>,
}

impl PluginFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory pre-registered with the bundled demo implementations.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register("vanilla-plugin", || Box::new(VanillaPlugin::new()));
        factory.register("style-plugin-example", || Box::new(StylePlugin::new()));
        factory.register("custom-block-plugin", || Box::new(CustomBlockPlugin::new()));
        factory
    }

    pub fn register(
        &mut self,
        id: impl Into<String>,
        builder: impl Fn() -> Box<dyn Plugin> + Send + Sync + 'static,
    ) {
        self.builders.insert(id.into(), Box::new(builder));
    }

    pub fn has(&self, id: &str) -> bool {
        self.builders.contains_key(id)
    }

    pub fn build(&self, id: &str) -> Option<Box<dyn Plugin>> {
        self.builders.get(id).map(|b| b())
    }
}

/// Instance used for descriptors with no compiled-in implementation
/// (plugins installed from a zip, whose code the editor shell loads
/// separately). Keeps `is_enabled` and export filtering truthful without
/// touching the workspace.
pub struct PlaceholderPlugin {
    id: String,
}

impl PlaceholderPlugin {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Plugin for PlaceholderPlugin {
    async fn on_load(&mut self, _host: &dyn WorkspaceHost) -> Result<()> {
        debug!(plugin = %self.id, "activating descriptor-only plugin");
        Ok(())
    }

    async fn on_unload(&mut self, _host: &dyn WorkspaceHost) -> Result<()> {
        Ok(())
    }
}

//! The baseline demo plugin: one block type in its own toolbox category.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::host::{BlockDefinition, ToolboxCategory, WorkspaceHost};
use crate::plugin::Plugin;

const BLOCK_TYPE: &str = "vanilla_plugin_test";
const CATEGORY: &str = "Plugins";

pub struct VanillaPlugin {
    applied: bool,
}

impl VanillaPlugin {
    pub fn new() -> Self {
        Self { applied: false }
    }
}

impl Default for VanillaPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for VanillaPlugin {
    async fn on_load(&mut self, host: &dyn WorkspaceHost) -> Result<()> {
        if !host.is_attached() {
            debug!("no workspace attached, skipping block registration");
            return Ok(());
        }

        host.register_block(BlockDefinition {
            block_type: BLOCK_TYPE.into(),
            label: "Vanilla plugin test".into(),
            colour: 200,
            tooltip: Some("Confirms the vanilla plugin is working.".into()),
            generator_stub: "# Vanilla Plugin Test\n".into(),
        });

        if !host.has_category(CATEGORY) {
            host.add_toolbox_category(ToolboxCategory {
                name: CATEGORY.into(),
                icon: "🔌".into(),
                colour: "#200".into(),
                block_types: vec![BLOCK_TYPE.into()],
            });
        }
        host.update_toolbox();

        self.applied = true;
        info!("vanilla plugin loaded");
        Ok(())
    }

    async fn on_unload(&mut self, host: &dyn WorkspaceHost) -> Result<()> {
        if !self.applied {
            return Ok(());
        }

        host.unregister_block(BLOCK_TYPE);
        host.remove_toolbox_category(CATEGORY);
        host.update_toolbox();

        self.applied = false;
        info!("vanilla plugin unloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DetachedHost, RecordingHost};

    #[tokio::test]
    async fn load_registers_block_and_category() {
        let host = RecordingHost::new();
        let mut plugin = VanillaPlugin::new();

        plugin.on_load(&host).await.unwrap();
        assert_eq!(host.block_types(), vec![BLOCK_TYPE.to_string()]);
        assert_eq!(host.category_names(), vec![CATEGORY.to_string()]);
        assert_eq!(host.toolbox_refreshes(), 1);
    }

    #[tokio::test]
    async fn unload_reverses_load_exactly() {
        let host = RecordingHost::new();
        let mut plugin = VanillaPlugin::new();

        plugin.on_load(&host).await.unwrap();
        plugin.on_unload(&host).await.unwrap();
        assert!(host.is_clean());
    }

    #[tokio::test]
    async fn unload_without_load_is_a_no_op() {
        let host = RecordingHost::new();
        let mut plugin = VanillaPlugin::new();

        plugin.on_unload(&host).await.unwrap();
        assert!(host.is_clean());
        assert_eq!(host.toolbox_refreshes(), 0);
    }

    #[tokio::test]
    async fn detached_host_degrades_to_no_op() {
        let host = DetachedHost;
        let mut plugin = VanillaPlugin::new();

        plugin.on_load(&host).await.unwrap();
        plugin.on_unload(&host).await.unwrap();
    }
}

//! Demo user-authored block plugin.
//!
//! Unlike the vanilla plugin it shares its toolbox category: if a "My
//! Blocks" category already exists the block is appended to it, and the
//! category is only removed on unload.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::host::{BlockDefinition, ToolboxCategory, WorkspaceHost};
use crate::plugin::Plugin;

const BLOCK_TYPE: &str = "custom_plugin_block";
const CATEGORY: &str = "My Blocks";

pub struct CustomBlockPlugin {
    applied: bool,
}

impl CustomBlockPlugin {
    pub fn new() -> Self {
        Self { applied: false }
    }
}

impl Default for CustomBlockPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for CustomBlockPlugin {
    async fn on_load(&mut self, host: &dyn WorkspaceHost) -> Result<()> {
        if !host.is_attached() {
            debug!("no workspace attached, skipping block registration");
            return Ok(());
        }

        host.register_block(BlockDefinition {
            block_type: BLOCK_TYPE.into(),
            label: "My block".into(),
            colour: 100,
            tooltip: None,
            generator_stub: "# Custom Block\n".into(),
        });

        if host.has_category(CATEGORY) {
            host.append_block_to_category(CATEGORY, BLOCK_TYPE);
        } else {
            host.add_toolbox_category(ToolboxCategory {
                name: CATEGORY.into(),
                icon: "🛠".into(),
                colour: "#100".into(),
                block_types: vec![BLOCK_TYPE.into()],
            });
        }
        host.update_toolbox();

        self.applied = true;
        info!("custom block plugin loaded");
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
        info!("custom block plugin unloaded");
        Ok(())
    }
}

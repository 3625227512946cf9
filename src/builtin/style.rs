//! Demo theme plugin: toggles a global styling flag.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::host::WorkspaceHost;
use crate::plugin::Plugin;

const STYLE_FLAG: &str = "custom-theme-active";

pub struct StylePlugin {
    applied: bool,
}

impl StylePlugin {
    pub fn new() -> Self {
        Self { applied: false }
    }
}

impl Default for StylePlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for StylePlugin {
    async fn on_load(&mut self, host: &dyn WorkspaceHost) -> Result<()> {
        host.set_style_flag(STYLE_FLAG, true);
        self.applied = true;
        info!("theme extension activated");
        Ok(())
    }

    async fn on_unload(&mut self, host: &dyn WorkspaceHost) -> Result<()> {
        if !self.applied {
            return Ok(());
        }
        host.set_style_flag(STYLE_FLAG, false);
        self.applied = false;
        info!("theme extension deactivated");
        Ok(())
    }
}

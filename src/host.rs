//! Host workspace capability seam.
//!
//! Plugins never touch the editor directly; they go through
//! [`WorkspaceHost`], which the editor shell implements against its block
//! workspace (block registration, toolbox palette, global style flags).
//! Running outside the editor degrades to no-ops, mirroring the policy
//! that an absent host API must never fail a lifecycle operation.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;

/// A block type a plugin installs into the workspace: display label,
/// palette colour hue, optional tooltip, and the code-generation stub
/// emitted for the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDefinition {
    pub block_type: String,
    pub label: String,
    pub colour: u16,
    pub tooltip: Option<String>,
    pub generator_stub: String,
}

/// A named category in the toolbox palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxCategory {
    pub name: String,
    pub icon: String,
    pub colour: String,
    pub block_types: Vec<String>,
}

/// Capability interface the lifecycle core depends on.
///
/// All mutating calls are idempotent where noted so unload hooks can run
/// safely even when nothing was applied.
pub trait WorkspaceHost: Send + Sync {
    /// Whether a real block workspace is attached. Block-affecting plugins
    /// skip registration entirely when it is not.
    fn is_attached(&self) -> bool;

    fn register_block(&self, definition: BlockDefinition);

    /// Idempotent: unregistering an unknown block type is a no-op.
    fn unregister_block(&self, block_type: &str);

    fn has_category(&self, name: &str) -> bool;

    fn add_toolbox_category(&self, category: ToolboxCategory);

    /// Append a block to an existing category; no-op if the category is
    /// missing.
    fn append_block_to_category(&self, category: &str, block_type: &str);

    /// Idempotent: removing an unknown category is a no-op.
    fn remove_toolbox_category(&self, name: &str);

    /// Rebuild the visible palette after category changes.
    fn update_toolbox(&self);

    /// Toggle a named global styling flag (the editor maps this onto a
    /// document-level CSS class).
    fn set_style_flag(&self, flag: &str, on: bool);
}

/// Host used when no editor workspace is present: everything is a no-op.
#[derive(Debug, Default)]
pub struct DetachedHost;

impl WorkspaceHost for DetachedHost {
    fn is_attached(&self) -> bool {
        false
    }

    fn register_block(&self, _definition: BlockDefinition) {}
    fn unregister_block(&self, _block_type: &str) {}

    fn has_category(&self, _name: &str) -> bool {
        false
    }

    fn add_toolbox_category(&self, _category: ToolboxCategory) {}
    fn append_block_to_category(&self, _category: &str, _block_type: &str) {}
    fn remove_toolbox_category(&self, _name: &str) {}
    fn update_toolbox(&self) {}
    fn set_style_flag(&self, _flag: &str, _on: bool) {}
}

#[derive(Debug, Default)]
struct RecordedState {
    blocks: BTreeMap<String, BlockDefinition>,
    categories: BTreeMap<String, ToolboxCategory>,
    style_flags: BTreeSet<String>,
    toolbox_refreshes: usize,
}

/// In-memory host that records every applied side effect, so tests (and
/// headless embeddings) can assert that unload reversed exactly what load
/// applied.
#[derive(Debug, Default)]
pub struct RecordingHost {
    state: Mutex<RecordedState>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_types(&self) -> Vec<String> {
        self.state.lock().blocks.keys().cloned().collect()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.state.lock().categories.keys().cloned().collect()
    }

    pub fn category_blocks(&self, name: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .categories
            .get(name)
            .map(|c| c.block_types.clone())
    }

    pub fn style_flag(&self, flag: &str) -> bool {
        self.state.lock().style_flags.contains(flag)
    }

    pub fn toolbox_refreshes(&self) -> usize {
        self.state.lock().toolbox_refreshes
    }

    /// True when no side effect is currently applied.
    pub fn is_clean(&self) -> bool {
        let state = self.state.lock();
        state.blocks.is_empty() && state.categories.is_empty() && state.style_flags.is_empty()
    }
}

impl WorkspaceHost for RecordingHost {
    fn is_attached(&self) -> bool {
        true
    }

    fn register_block(&self, definition: BlockDefinition) {
        self.state
            .lock()
            .blocks
            .insert(definition.block_type.clone(), definition);
    }

    fn unregister_block(&self, block_type: &str) {
        self.state.lock().blocks.remove(block_type);
    }

    fn has_category(&self, name: &str) -> bool {
        self.state.lock().categories.contains_key(name)
    }

    fn add_toolbox_category(&self, category: ToolboxCategory) {
        self.state
            .lock()
            .categories
            .insert(category.name.clone(), category);
    }

    fn append_block_to_category(&self, category: &str, block_type: &str) {
        if let Some(existing) = self.state.lock().categories.get_mut(category) {
            existing.block_types.push(block_type.to_string());
        }
    }

    fn remove_toolbox_category(&self, name: &str) {
        self.state.lock().categories.remove(name);
    }

    fn update_toolbox(&self) {
        self.state.lock().toolbox_refreshes += 1;
    }

    fn set_style_flag(&self, flag: &str, on: bool) {
        let mut state = self.state.lock();
        if on {
            state.style_flags.insert(flag.to_string());
        } else {
            state.style_flags.remove(flag);
        }
    }
}

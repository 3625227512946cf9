//! Plugin lifecycle manager.
//!
//! Owns the registry, the factory map, the active-instance map, and the
//! injected settings store. All mutations originate from the editor's UI
//! thread; the persisted enabled set is rewritten in full immediately
//! after every enable/disable so no update is ever lost.

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{PluginError, Result};
use crate::host::WorkspaceHost;
use crate::plugin::{PlaceholderPlugin, Plugin, PluginFactory};
use crate::registry::{PluginDescriptor, PluginRegistry};
use crate::store::SettingsStore;

pub struct PluginManager {
    registry: PluginRegistry,
    factory: PluginFactory,
    host: Arc<dyn WorkspaceHost>,
    store: Box<dyn SettingsStore>,
    /// id → live instance. Source of truth for `is_enabled`.
    active: HashMap<String, Box<dyn Plugin>>,
    /// Enabled ids in insertion order; mirrors the persisted set.
    enabled: Vec<String>,
}

impl PluginManager {
    /// Build a manager over an explicit registry and factory. The enabled
    /// set is loaded from the store immediately, but nothing is activated
    /// until [`initialize`](Self::initialize).
    pub fn new(
        registry: PluginRegistry,
        factory: PluginFactory,
        host: Arc<dyn WorkspaceHost>,
        store: Box<dyn SettingsStore>,
    ) -> Self {
        let enabled = store.load();
        Self {
            registry,
            factory,
            host,
            store,
            active: HashMap::new(),
            enabled,
        }
    }

    /// Manager over the bundled registry and demo implementations.
    pub fn with_builtins(host: Arc<dyn WorkspaceHost>, store: Box<dyn SettingsStore>) -> Self {
        Self::new(
            PluginRegistry::builtin(),
            PluginFactory::with_builtins(),
            host,
            store,
        )
    }

    /// Activate every persisted id, in persisted (insertion) order.
    ///
    /// A failure enabling one id never prevents attempting the rest, and
    /// ids whose descriptor left the registry between sessions are skipped
    /// without error.
    pub async fn initialize(&mut self) {
        info!(persisted = self.enabled.len(), "initializing plugin manager");
        let pending = self.enabled.clone();
        for id in pending {
            if let Err(e) = self.enable(&id).await {
                warn!(plugin = %id, error = %e, "failed to restore persisted plugin");
            }
        }
    }

    /// Enable a plugin by id.
    ///
    /// No-op if already active. An id with no registry descriptor is
    /// logged and ignored (stale persisted ids are tolerated by design).
    /// Descriptors without a registered factory activate as
    /// descriptor-only placeholders. A failing load hook leaves no
    /// partial state: the instance is asked to unwind whatever it
    /// applied and the id stays out of the enabled set.
    pub async fn enable(&mut self, id: &str) -> Result<()> {
        if self.active.contains_key(id) {
            return Ok(());
        }
        if self.registry.find_by_id(id).is_none() {
            warn!(plugin = %id, "enable requested for unknown plugin id");
            return Ok(());
        }

        let mut instance: Box<dyn Plugin> = self
            .factory
            .build(id)
            .unwrap_or_else(|| Box::new(PlaceholderPlugin::new(id)));

        if let Err(e) = instance.on_load(self.host.as_ref()).await {
            warn!(plugin = %id, error = %e, "load hook failed, rolling back");
            if let Err(undo) = instance.on_unload(self.host.as_ref()).await {
                warn!(plugin = %id, error = %undo, "rollback unload also failed");
            }
            return Err(PluginError::Load {
                id: id.to_string(),
                message: e.to_string(),
            });
        }

        self.active.insert(id.to_string(), instance);
        if !self.enabled.iter().any(|e| e == id) {
            self.enabled.push(id.to_string());
        }
        self.persist();
        info!(plugin = %id, "plugin enabled");
        Ok(())
    }

    /// Disable a plugin by id.
    ///
    /// The teardown hook is awaited to completion before the instance is
    /// removed. Disabling an id that is neither active nor persisted is a
    /// no-op; a stale persisted id without an instance is still dropped
    /// from the persisted set.
    pub async fn disable(&mut self, id: &str) -> Result<()> {
        let instance = self.active.remove(id);
        let was_persisted = self.enabled.iter().any(|e| e == id);
        if instance.is_none() && !was_persisted {
            return Ok(());
        }

        if let Some(mut instance) = instance {
            if let Err(e) = instance.on_unload(self.host.as_ref()).await {
                warn!(plugin = %id, error = %e, "unload hook failed");
            }
        }

        self.enabled.retain(|e| e != id);
        self.persist();
        info!(plugin = %id, "plugin disabled");
        Ok(())
    }

    /// Whether `id` currently has an active instance. Persisted ids that
    /// have not been reconciled by `initialize` report `false`.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    /// Registry descriptors in stable order.
    pub fn list_registry(&self) -> &[PluginDescriptor] {
        self.registry.descriptors()
    }

    /// Enabled plugin ids that may travel with a shared project.
    ///
    /// Style-affecting plugins are local-only and excluded outright; of
    /// the rest, only vetted (non-custom) block-affecting plugins are
    /// exportable, since a recipient cannot resolve custom block
    /// definitions.
    pub fn plugins_eligible_for_export(&self) -> Vec<String> {
        self.enabled
            .iter()
            .filter_map(|id| self.registry.find_by_id(id))
            .filter(|d| !d.affects_style && d.affects_blocks && !d.is_custom)
            .map(|d| d.id.clone())
            .collect()
    }

    /// True iff any enabled plugin is custom and block-affecting — the
    /// presentation layer warns before sharing when this holds.
    pub fn has_unexportable_custom_block_plugin(&self) -> bool {
        self.enabled
            .iter()
            .filter_map(|id| self.registry.find_by_id(id))
            .any(|d| d.affects_blocks && d.is_custom)
    }

    /// Install a plugin from a user-supplied zip archive.
    ///
    /// On success the manifest's descriptor joins the registry (replacing
    /// a same-id descriptor) without being enabled. Malformed archives
    /// surface a descriptive [`PluginError::Install`].
    pub fn install_from_zip<R: Read + Seek>(&mut self, archive: R) -> Result<PluginDescriptor> {
        let descriptor = crate::install::read_descriptor(archive)?;
        info!(plugin = %descriptor.id, name = %descriptor.name, "installed plugin from archive");
        self.registry.register(descriptor.clone());
        Ok(descriptor)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.enabled) {
            warn!(error = %e, "failed to persist enabled-plugin set");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::store::MemoryStore;
    use anyhow::anyhow;
    use async_trait::async_trait;

    fn manager_with(store: MemoryStore) -> (Arc<RecordingHost>, PluginManager) {
        let host = Arc::new(RecordingHost::new());
        let manager = PluginManager::with_builtins(host.clone(), Box::new(store));
        (host, manager)
    }

    #[tokio::test]
    async fn enable_activates_and_persists() {
        let (host, mut manager) = manager_with(MemoryStore::new());

        manager.enable("vanilla-plugin").await.unwrap();
        assert!(manager.is_enabled("vanilla-plugin"));
        assert_eq!(
            manager.store.load(),
            vec!["vanilla-plugin".to_string()]
        );
        assert!(!host.is_clean());
    }

    #[tokio::test]
    async fn enable_twice_is_a_no_op() {
        let (host, mut manager) = manager_with(MemoryStore::new());

        manager.enable("vanilla-plugin").await.unwrap();
        let refreshes = host.toolbox_refreshes();
        manager.enable("vanilla-plugin").await.unwrap();

        assert_eq!(host.toolbox_refreshes(), refreshes);
        assert_eq!(manager.store.load().len(), 1);
    }

    #[tokio::test]
    async fn enable_unknown_id_is_silent() {
        let (_host, mut manager) = manager_with(MemoryStore::new());

        manager.enable("no-such-plugin").await.unwrap();
        assert!(!manager.is_enabled("no-such-plugin"));
        assert!(manager.store.load().is_empty());
    }

    #[tokio::test]
    async fn disable_reverses_side_effects() {
        let (host, mut manager) = manager_with(MemoryStore::new());

        manager.enable("vanilla-plugin").await.unwrap();
        manager.disable("vanilla-plugin").await.unwrap();

        assert!(!manager.is_enabled("vanilla-plugin"));
        assert!(host.is_clean());
        assert!(manager.store.load().is_empty());
    }

    #[tokio::test]
    async fn disable_never_enabled_id_is_a_no_op() {
        let (_host, mut manager) = manager_with(MemoryStore::new());
        manager.disable("vanilla-plugin").await.unwrap();
        manager.disable("no-such-plugin").await.unwrap();
        assert!(manager.store.load().is_empty());
    }

    #[tokio::test]
    async fn double_disable_leaves_state_unchanged() {
        let (_host, mut manager) = manager_with(MemoryStore::new());

        manager.enable("vanilla-plugin").await.unwrap();
        manager.disable("vanilla-plugin").await.unwrap();
        manager.disable("vanilla-plugin").await.unwrap();
        assert!(manager.store.load().is_empty());
    }

    #[tokio::test]
    async fn initialize_restores_persisted_set_in_order() {
        let store = MemoryStore::with_ids(&["style-plugin-example", "vanilla-plugin"]);
        let (_host, mut manager) = manager_with(store);

        manager.initialize().await;
        assert!(manager.is_enabled("style-plugin-example"));
        assert!(manager.is_enabled("vanilla-plugin"));
        assert_eq!(
            manager.store.load(),
            vec![
                "style-plugin-example".to_string(),
                "vanilla-plugin".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn initialize_skips_ids_gone_from_registry() {
        let store = MemoryStore::with_ids(&["vanilla-plugin", "ghost-plugin"]);
        let (_host, mut manager) = manager_with(store);

        manager.initialize().await;
        assert!(manager.is_enabled("vanilla-plugin"));
        assert!(!manager.is_enabled("ghost-plugin"));
    }

    #[tokio::test]
    async fn export_filtering_matches_sharing_rules() {
        let (_host, mut manager) = manager_with(MemoryStore::new());

        manager.enable("vanilla-plugin").await.unwrap();
        manager.enable("style-plugin-example").await.unwrap();
        manager.enable("custom-block-plugin").await.unwrap();

        assert_eq!(
            manager.plugins_eligible_for_export(),
            vec!["vanilla-plugin".to_string()]
        );
        assert!(manager.has_unexportable_custom_block_plugin());
    }

    #[tokio::test]
    async fn no_custom_block_warning_without_custom_plugin() {
        let (_host, mut manager) = manager_with(MemoryStore::new());

        manager.enable("vanilla-plugin").await.unwrap();
        manager.enable("style-plugin-example").await.unwrap();
        assert!(!manager.has_unexportable_custom_block_plugin());
    }

    struct FailingPlugin;

    #[async_trait]
    impl Plugin for FailingPlugin {
        async fn on_load(&mut self, host: &dyn WorkspaceHost) -> anyhow::Result<()> {
            // Applies a partial effect before failing, to exercise rollback.
            host.set_style_flag("half-applied", true);
            Err(anyhow!("setup exploded"))
        }

        async fn on_unload(&mut self, host: &dyn WorkspaceHost) -> anyhow::Result<()> {
            host.set_style_flag("half-applied", false);
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_load_leaves_no_partial_state() {
        let mut registry = PluginRegistry::builtin();
        registry.register(PluginDescriptor {
            id: "broken-plugin".into(),
            name: "Broken".into(),
            author: "test".into(),
            version: "0.0.1".into(),
            description: String::new(),
            repository_url: String::new(),
            update_date: String::new(),
            uuid: String::new(),
            affects_style: false,
            affects_blocks: true,
            is_custom: false,
        });
        let mut factory = PluginFactory::with_builtins();
        factory.register("broken-plugin", || Box::new(FailingPlugin));

        let host = Arc::new(RecordingHost::new());
        let mut manager = PluginManager::new(
            registry,
            factory,
            host.clone(),
            Box::new(MemoryStore::new()),
        );

        let err = manager.enable("broken-plugin").await.unwrap_err();
        assert!(matches!(err, PluginError::Load { .. }));
        assert!(!manager.is_enabled("broken-plugin"));
        assert!(manager.store.load().is_empty());
        assert!(host.is_clean());
    }

    #[tokio::test]
    async fn installed_descriptor_enables_as_placeholder() {
        let (host, mut manager) = manager_with(MemoryStore::new());

        let archive = zip_manifest(
            r#"{"id": "zip-plugin", "name": "Zip Plugin", "version": "1.0.0", "affects_blocks": true}"#,
        );
        let descriptor = manager.install_from_zip(archive).unwrap();
        assert!(descriptor.is_custom);
        assert!(!manager.is_enabled("zip-plugin"));

        manager.enable("zip-plugin").await.unwrap();
        assert!(manager.is_enabled("zip-plugin"));
        // Placeholder applies nothing to the workspace.
        assert!(host.is_clean());
        // A custom block-affecting plugin is never exportable.
        assert!(manager.has_unexportable_custom_block_plugin());
        assert!(manager.plugins_eligible_for_export().is_empty());
    }

    fn zip_manifest(manifest: &str) -> std::io::Cursor<Vec<u8>> {
        use std::io::Write;
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("plugin.json", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(manifest.as_bytes()).unwrap();
        writer.finish().unwrap()
    }
}

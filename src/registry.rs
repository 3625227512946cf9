//! Static plugin catalog — descriptors and lookup.

use serde::{Deserialize, Serialize};

/// Immutable metadata record for a known plugin.
///
/// `id` uniquely identifies a descriptor within the registry for the
/// process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub id: String,
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
    #[serde(default)]
    pub repository_url: String,
    #[serde(default)]
    pub update_date: String,
    #[serde(default)]
    pub uuid: String,
    /// Plugin customizes editor styling; style changes are local-only.
    #[serde(default)]
    pub affects_style: bool,
    /// Plugin registers block types / toolbox categories.
    #[serde(default)]
    pub affects_blocks: bool,
    /// User-authored, unvetted plugin (installed from a zip or hand-written).
    #[serde(default)]
    pub is_custom: bool,
}

/// Ordered catalog of plugin descriptors.
///
/// Seed data is bundled; installation from an archive appends to the
/// in-memory catalog for the session. Iteration order is stable:
/// registration order, with re-registration of an existing id replacing
/// the descriptor in place.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry pre-seeded with the bundled demo plugins.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(PluginDescriptor {
            id: "vanilla-plugin".into(),
            name: "Vanilla Plugin".into(),
            author: "EDBPlugin".into(),
            version: "1.0.0".into(),
            description: "Extends the editor with the baseline demo block.".into(),
            repository_url: "https://github.com/EDBPlugin/easy-bdp".into(),
            update_date: "2026-02-07".into(),
            uuid: "6e64c1a2-45d3-4cf0-9c8a-0f2a6d9b1c01".into(),
            affects_style: false,
            affects_blocks: true,
            is_custom: false,
        });
        registry.register(PluginDescriptor {
            id: "style-plugin-example".into(),
            name: "Theme Extension".into(),
            author: "EDBPlugin".into(),
            version: "1.0.0".into(),
            description: "Customizes the editor's visual theme.".into(),
            repository_url: "https://github.com/EDBPlugin/easy-bdp".into(),
            update_date: "2026-02-07".into(),
            uuid: "9b1f0d3c-7a2e-4b8f-b6d4-5c3e8a7f2d02".into(),
            affects_style: true,
            affects_blocks: false,
            is_custom: false,
        });
        registry.register(PluginDescriptor {
            id: "custom-block-plugin".into(),
            name: "Custom Blocks".into(),
            author: "User".into(),
            version: "1.0.0".into(),
            description: "Adds user-authored blocks to the workspace.".into(),
            repository_url: String::new(),
            update_date: "2026-02-07".into(),
            uuid: "2c8d4e5f-1a6b-4c9d-8e7f-3b5a9c1d4e03".into(),
            affects_style: false,
            affects_blocks: true,
            is_custom: true,
        });
        registry
    }

    /// Add a descriptor, replacing any existing descriptor with the same id.
    pub fn register(&mut self, descriptor: PluginDescriptor) {
        if let Some(existing) = self
            .descriptors
            .iter_mut()
            .find(|d| d.id == descriptor.id)
        {
            *existing = descriptor;
        } else {
            self.descriptors.push(descriptor);
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&PluginDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Descriptors in stable registration order.
    pub fn descriptors(&self) -> &[PluginDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_stable_order() {
        let registry = PluginRegistry::builtin();
        let ids: Vec<&str> = registry.descriptors().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            ["vanilla-plugin", "style-plugin-example", "custom-block-plugin"]
        );
    }

    #[test]
    fn find_by_id_hits_and_misses() {
        let registry = PluginRegistry::builtin();
        assert!(registry.find_by_id("vanilla-plugin").is_some());
        assert!(registry.find_by_id("no-such-plugin").is_none());
    }

    #[test]
    fn register_replaces_existing_id() {
        let mut registry = PluginRegistry::builtin();
        let len_before = registry.len();

        let mut updated = registry.find_by_id("vanilla-plugin").unwrap().clone();
        updated.version = "2.0.0".into();
        registry.register(updated);

        assert_eq!(registry.len(), len_before);
        assert_eq!(
            registry.find_by_id("vanilla-plugin").unwrap().version,
            "2.0.0"
        );
        // Replacement keeps the original position.
        assert_eq!(registry.descriptors()[0].id, "vanilla-plugin");
    }

    #[test]
    fn descriptor_deserializes_with_flag_defaults() {
        let descriptor: PluginDescriptor = serde_json::from_str(
            r#"{
                "id": "minimal",
                "name": "Minimal",
                "author": "someone",
                "version": "0.1.0",
                "description": ""
            }"#,
        )
        .unwrap();
        assert!(!descriptor.affects_style);
        assert!(!descriptor.affects_blocks);
        assert!(!descriptor.is_custom);
    }
}

//! Zip archive installation: manifest extraction and validation.
//!
//! A plugin archive carries a `plugin.json` manifest, either at the
//! archive root or inside a single top-level directory (the shape GitHub
//! produces for "download as zip"). Installation only yields a descriptor;
//! it never enables anything.

use std::io::{Read, Seek};

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::registry::PluginDescriptor;

pub const MANIFEST_FILENAME: &str = "plugin.json";

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("could not read archive: {0}")]
    Archive(String),

    #[error("archive does not contain a {MANIFEST_FILENAME} manifest")]
    MissingManifest,

    #[error("could not parse {MANIFEST_FILENAME}: {0}")]
    ManifestParse(String),

    #[error("{MANIFEST_FILENAME} is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Manifest shape inside the archive. `id`, `name`, and `version` are
/// required; the rest defaults.
#[derive(Debug, Deserialize)]
struct ZipManifest {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    repository: String,
    #[serde(default)]
    affects_style: bool,
    #[serde(default)]
    affects_blocks: bool,
}

impl ZipManifest {
    fn validate(&self) -> Result<(), InstallError> {
        if self.id.trim().is_empty() {
            return Err(InstallError::MissingField("id"));
        }
        if self.name.trim().is_empty() {
            return Err(InstallError::MissingField("name"));
        }
        if self.version.trim().is_empty() {
            return Err(InstallError::MissingField("version"));
        }
        Ok(())
    }
}

/// Locate the manifest entry: root first, then one directory deep.
fn manifest_entry<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Option<String> {
    let mut nested = None;
    for name in archive.file_names() {
        if name == MANIFEST_FILENAME {
            return Some(name.to_string());
        }
        if nested.is_none()
            && name.ends_with(&format!("/{MANIFEST_FILENAME}"))
            && name.matches('/').count() == 1
        {
            nested = Some(name.to_string());
        }
    }
    nested
}

/// Extract and validate the manifest from a plugin zip, producing the
/// descriptor to register. Installed plugins are always treated as
/// custom (unvetted), so they never travel with a shared project.
pub fn read_descriptor<R: Read + Seek>(reader: R) -> Result<PluginDescriptor, InstallError> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| InstallError::Archive(e.to_string()))?;

    let entry = manifest_entry(&archive).ok_or(InstallError::MissingManifest)?;
    let mut raw = String::new();
    archive
        .by_name(&entry)
        .map_err(|e| InstallError::Archive(e.to_string()))?
        .read_to_string(&mut raw)
        .map_err(|e| InstallError::Archive(e.to_string()))?;

    let manifest: ZipManifest =
        serde_json::from_str(&raw).map_err(|e| InstallError::ManifestParse(e.to_string()))?;
    manifest.validate()?;

    info!(plugin = %manifest.id, version = %manifest.version, "read plugin manifest from archive");

    Ok(PluginDescriptor {
        id: manifest.id,
        name: manifest.name,
        author: manifest.author,
        version: manifest.version,
        description: manifest.description,
        repository_url: manifest.repository,
        update_date: Utc::now().format("%Y-%m-%d").to_string(),
        uuid: uuid::Uuid::new_v4().to_string(),
        affects_style: manifest.affects_style,
        affects_blocks: manifest.affects_blocks,
        is_custom: true,
    })
}

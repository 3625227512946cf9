//! Discovery result types and trust-level derivation.

use serde::{Deserialize, Serialize};

/// GitHub organization whose repositories are first-party plugins.
pub const OFFICIAL_ORG: &str = "EDBPlugin";

/// Vetted third-party maintainers whose plugins render as certified.
pub const CERTIFIED_MAINTAINERS: &[&str] = &["edbp-contrib", "blockworks-dev"];

/// Provenance classification of a remote plugin, derived from the
/// repository owner's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Official,
    Certified,
    Community,
}

impl TrustLevel {
    pub fn for_owner(owner: &str) -> Self {
        if owner == OFFICIAL_ORG {
            Self::Official
        } else if CERTIFIED_MAINTAINERS.contains(&owner) {
            Self::Certified
        } else {
            Self::Community
        }
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Official => write!(f, "official"),
            Self::Certified => write!(f, "certified"),
            Self::Community => write!(f, "community"),
        }
    }
}

/// One candidate plugin from a discovery search, mapped from a GitHub
/// repository search item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubPluginSummary {
    pub name: String,
    pub author: String,
    /// `owner/repo` path used for README fetches.
    pub full_name: String,
    pub default_branch: String,
    pub stars: u64,
    pub description: String,
    pub repository_url: String,
    pub trust_level: TrustLevel,
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TagError};
use crate::platform::Platform;

/// Tagging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Registry hostname images are published to
    pub registry: String,

    /// Registry owner (organisation)
    pub owner: String,

    /// Container runtime binary
    pub docker: String,

    /// Git checkout the images were built from (for the commit SHA tag)
    pub repository_root: PathBuf,

    /// Platforms merged into one manifest
    pub platforms: Vec<Platform>,

    /// Image hierarchy override; the built-in table is used when absent
    pub images: Option<BTreeMap<String, ImageConfig>>,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            registry: "quay.io".to_string(),
            owner: "jupyter".to_string(),
            docker: "docker".to_string(),
            repository_root: PathBuf::from("."),
            platforms: Platform::ALL.to_vec(),
            images: None,
        }
    }
}

impl TaggingConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TagError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded tagging configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.registry.is_empty() || self.owner.is_empty() {
            return Err(TagError::ConfigError(
                "registry and owner must not be empty".to_string(),
            ));
        }
        if self.platforms.is_empty() {
            return Err(TagError::ConfigError(
                "at least one platform is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Full image name without tag, e.g. `quay.io/jupyter/base-notebook`.
    pub fn image_name(&self, short_image_name: &str) -> String {
        format!("{}/{}/{}", self.registry, self.owner, short_image_name)
    }
}

/// One entry of a configured image hierarchy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Parent image name; absent for the root image
    #[serde(default)]
    pub parent: Option<String>,

    /// Tagger names, in the order tags are produced
    #[serde(default)]
    pub taggers: Vec<String>,
}

//! Image hierarchy.
//!
//! Maps each image to its parent and to the taggers it adds on top of the
//! parent's. The table is validated once at construction: every parent
//! must be a known image and the parent chain must not loop.

use std::collections::{BTreeMap, HashSet};

use stacks_tag_core::config::ImageConfig;
use stacks_tag_core::error::{Result, TagError};

use crate::taggers::Tagger;

/// One image's place in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescription {
    /// Parent image name; `None` for a root image
    pub parent_image: Option<String>,
    /// Taggers this image adds, in declared order
    pub taggers: Vec<Tagger>,
}

impl ImageDescription {
    pub fn new(parent_image: Option<&str>, taggers: Vec<Tagger>) -> Self {
        Self {
            parent_image: parent_image.map(str::to_string),
            taggers,
        }
    }
}

/// Validated, acyclic image hierarchy.
#[derive(Debug, Clone)]
pub struct ImageHierarchy {
    images: BTreeMap<String, ImageDescription>,
}

impl ImageHierarchy {
    /// Build a hierarchy, rejecting unknown parents and cycles.
    pub fn new(images: BTreeMap<String, ImageDescription>) -> Result<Self> {
        for (name, description) in &images {
            if let Some(parent) = &description.parent_image {
                if !images.contains_key(parent) {
                    return Err(TagError::HierarchyError(format!(
                        "image '{}' has unknown parent '{}'",
                        name, parent
                    )));
                }
            }
        }

        for name in images.keys() {
            let mut seen = HashSet::new();
            let mut current = Some(name.as_str());
            while let Some(image) = current {
                if !seen.insert(image) {
                    return Err(TagError::HierarchyError(format!(
                        "parent chain of '{}' loops back to '{}'",
                        name, image
                    )));
                }
                current = images[image].parent_image.as_deref();
            }
        }

        Ok(Self { images })
    }

    /// The docker-stacks image family.
    pub fn builtin() -> Result<Self> {
        use Tagger::*;

        let table = [
            (
                "base-notebook",
                ImageDescription::new(
                    None,
                    vec![
                        Sha,
                        PythonVersion,
                        JupyterNotebookVersion,
                        JupyterLabVersion,
                        JupyterHubVersion,
                    ],
                ),
            ),
            ("minimal-notebook", ImageDescription::new(Some("base-notebook"), vec![])),
            ("scipy-notebook", ImageDescription::new(Some("minimal-notebook"), vec![])),
            ("r-notebook", ImageDescription::new(Some("minimal-notebook"), vec![RVersion])),
            (
                "tensorflow-notebook",
                ImageDescription::new(Some("scipy-notebook"), vec![TensorflowVersion]),
            ),
            (
                "datascience-notebook",
                ImageDescription::new(Some("scipy-notebook"), vec![JuliaVersion]),
            ),
            (
                "pyspark-notebook",
                ImageDescription::new(
                    Some("scipy-notebook"),
                    vec![SparkVersion, HadoopVersion, JavaVersion],
                ),
            ),
            (
                "allspark-notebook",
                ImageDescription::new(Some("pyspark-notebook"), vec![RVersion]),
            ),
        ];

        Self::new(
            table
                .into_iter()
                .map(|(name, description)| (name.to_string(), description))
                .collect(),
        )
    }

    /// Build from a configured table, resolving tagger names.
    pub fn from_config(images: &BTreeMap<String, ImageConfig>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for (name, config) in images {
            let taggers = config
                .taggers
                .iter()
                .map(|t| t.parse::<Tagger>())
                .collect::<Result<Vec<_>>>()?;
            table.insert(
                name.clone(),
                ImageDescription {
                    parent_image: config.parent.clone(),
                    taggers,
                },
            );
        }
        Self::new(table)
    }

    pub fn get(&self, image: &str) -> Result<&ImageDescription> {
        self.images
            .get(image)
            .ok_or_else(|| TagError::UnknownImage(image.to_string()))
    }

    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    /// Image and its ancestors, root first.
    pub fn lineage(&self, image: &str) -> Result<Vec<&str>> {
        let mut chain = Vec::new();
        let mut current = Some(image);
        while let Some(name) = current {
            let (key, description) = self
                .images
                .get_key_value(name)
                .ok_or_else(|| TagError::UnknownImage(name.to_string()))?;
            chain.push(key.as_str());
            current = description.parent_image.as_deref();
        }
        chain.reverse();
        Ok(chain)
    }

    /// Inherited taggers followed by the image's own, each level in declared order.
    pub fn effective_taggers(&self, image: &str) -> Result<Vec<Tagger>> {
        let mut taggers = Vec::new();
        for name in self.lineage(image)? {
            taggers.extend(self.images[name].taggers.iter().copied());
        }
        Ok(taggers)
    }
}

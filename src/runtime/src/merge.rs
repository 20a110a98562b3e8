//! Multi-arch manifest merging.
//!
//! Reads the tags file of every platform, strips the platform prefix to
//! recover canonical tags, pulls each platform image and amends one
//! manifest per canonical tag. All tags files are read before the first
//! pull; any failure aborts the remaining merges.

use std::path::Path;

use stacks_tag_core::error::{Result, TagError};
use stacks_tag_core::platform::Platform;

use crate::docker::DockerCli;
use crate::tags::{read_tags_file, split_reference, tags_file_path};

/// How a merge is carried out.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Platforms whose images become manifest entries, in entry order
    pub platforms: Vec<Platform>,
    /// Image variant selecting `<platform>-<variant>` tags files
    pub variant: Option<String>,
    /// Push each manifest after creating it
    pub push: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            variant: None,
            push: false,
        }
    }
}

/// Strip `<arch_prefix>-` from the tag part of every reference.
pub fn canonical_tags(tags: &[String], arch_prefix: &str) -> Result<Vec<String>> {
    let marker = format!("{}-", arch_prefix);
    tags.iter()
        .map(|tag| {
            let (repository, suffix) = split_reference(tag);
            suffix
                .and_then(|s| s.strip_prefix(marker.as_str()))
                .filter(|rest| !rest.is_empty())
                .map(|rest| format!("{}:{}", repository, rest))
                .ok_or_else(|| {
                    TagError::parse(
                        "merge",
                        format!("tag '{}' does not carry the '{}' prefix", tag, marker),
                    )
                })
        })
        .collect()
}

/// Platform-specific reference for a canonical tag.
pub fn platform_tag(canonical: &str, platform: Platform) -> String {
    let (repository, tag) = split_reference(canonical);
    format!(
        "{}:{}-{}",
        repository,
        platform.as_str(),
        tag.unwrap_or(crate::tags::LATEST_TAG)
    )
}

/// Merge the per-platform tags of `short_image_name` into multi-arch manifests.
///
/// Returns the canonical tags that were merged, in first-seen order.
pub async fn merge_tags(
    docker: &DockerCli,
    short_image_name: &str,
    tags_dir: &Path,
    options: &MergeOptions,
) -> Result<Vec<String>> {
    tracing::info!(image = short_image_name, "Merging tags");

    let mut all_tags: Vec<String> = Vec::new();
    for platform in &options.platforms {
        let prefix = platform.tags_prefix(options.variant.as_deref());
        let path = tags_file_path(tags_dir, &prefix, short_image_name);
        let tags = read_tags_file(&path)?;
        for tag in canonical_tags(&tags, platform.as_str())? {
            if !all_tags.contains(&tag) {
                all_tags.push(tag);
            }
        }
    }

    for tag in &all_tags {
        tracing::info!(tag = %tag, "Trying to merge tag");
        let images: Vec<String> = options
            .platforms
            .iter()
            .map(|platform| platform_tag(tag, *platform))
            .collect();
        for image in &images {
            docker.pull(image).await?;
        }
        docker.manifest_create(tag, &images).await?;
        if options.push {
            docker.manifest_push(tag).await?;
        }
    }

    tracing::info!(image = short_image_name, merged = all_tags.len(), "Merged tags");
    Ok(all_tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::write_tags_file;
    use crate::testing::ScriptedRunner;
    use std::sync::Arc;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_tags_strip_prefix() {
        let tags = strings(&["myimage:x86_64-latest", "myimage:x86_64-python-3.11.4"]);
        assert_eq!(
            canonical_tags(&tags, "x86_64").unwrap(),
            vec!["myimage:latest", "myimage:python-3.11.4"]
        );
    }

    #[test]
    fn test_canonical_tags_keep_count() {
        let tags = strings(&[
            "quay.io/jupyter/scipy-notebook:aarch64-latest",
            "quay.io/jupyter/scipy-notebook:aarch64-0123456789ab",
            "quay.io/jupyter/scipy-notebook:aarch64-lab-4.0.2",
            "quay.io/jupyter/scipy-notebook:aarch64-aarch64-weird",
        ]);
        let canonical = canonical_tags(&tags, "aarch64").unwrap();
        assert_eq!(canonical.len(), tags.len());
        assert_eq!(canonical[3], "quay.io/jupyter/scipy-notebook:aarch64-weird");
    }

    #[test]
    fn test_canonical_tags_reject_unprefixed() {
        let err = canonical_tags(&strings(&["myimage:latest"]), "x86_64").unwrap_err();
        assert!(matches!(err, TagError::ParseError { .. }));
    }

    #[test]
    fn test_platform_tag_with_registry_port() {
        assert_eq!(
            platform_tag("localhost:5000/jupyter/base-notebook:lab-4.0.2", Platform::Aarch64),
            "localhost:5000/jupyter/base-notebook:aarch64-lab-4.0.2"
        );
    }

    #[test]
    fn test_tags_file_round_trip_through_merge_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let tags = strings(&["img:x86_64-latest", "img:x86_64-a", "img:x86_64-b"]);
        let path = write_tags_file(dir.path(), "x86_64", "img", &tags).unwrap();
        let read = read_tags_file(&path).unwrap();
        assert_eq!(canonical_tags(&read, "x86_64").unwrap().len(), tags.len());
    }

    #[tokio::test]
    async fn test_merge_single_tag() {
        let dir = tempfile::tempdir().unwrap();
        write_tags_file(dir.path(), "x86_64", "myimage", &strings(&["myimage:x86_64-python-3.11.4"])).unwrap();
        write_tags_file(dir.path(), "aarch64", "myimage", &strings(&["myimage:aarch64-python-3.11.4"])).unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let docker = DockerCli::new(runner.clone(), "docker");

        let merged = merge_tags(&docker, "myimage", dir.path(), &MergeOptions::default())
            .await
            .unwrap();

        assert_eq!(merged, vec!["myimage:python-3.11.4"]);
        assert_eq!(
            runner.calls(),
            vec![
                "docker pull myimage:x86_64-python-3.11.4",
                "docker pull myimage:aarch64-python-3.11.4",
                "docker manifest create --amend myimage:python-3.11.4 myimage:x86_64-python-3.11.4 myimage:aarch64-python-3.11.4",
            ]
        );
    }

    #[tokio::test]
    async fn test_merge_variant_with_push() {
        let dir = tempfile::tempdir().unwrap();
        write_tags_file(dir.path(), "x86_64-cuda12", "pytorch-notebook", &strings(&["img:x86_64-cuda12-latest"])).unwrap();
        write_tags_file(dir.path(), "aarch64-cuda12", "pytorch-notebook", &strings(&["img:aarch64-cuda12-latest"])).unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let docker = DockerCli::new(runner.clone(), "docker");
        let options = MergeOptions {
            variant: Some("cuda12".to_string()),
            push: true,
            ..MergeOptions::default()
        };

        let merged = merge_tags(&docker, "pytorch-notebook", dir.path(), &options).await.unwrap();

        assert_eq!(merged, vec!["img:cuda12-latest"]);
        assert_eq!(
            runner.calls().last().unwrap(),
            "docker manifest push img:cuda12-latest"
        );
        assert_eq!(runner.calls_starting_with("docker pull").len(), 2);
    }

    #[tokio::test]
    async fn test_merge_missing_file_aborts_before_pulls() {
        let dir = tempfile::tempdir().unwrap();
        write_tags_file(dir.path(), "x86_64", "myimage", &strings(&["myimage:x86_64-latest"])).unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let docker = DockerCli::new(runner.clone(), "docker");

        let err = merge_tags(&docker, "myimage", dir.path(), &MergeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TagError::MissingTagsFile { ref path } if path.ends_with("aarch64-myimage.txt")));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_merge_pull_failure_stops_remaining_tags() {
        let dir = tempfile::tempdir().unwrap();
        let x86 = strings(&["img:x86_64-latest", "img:x86_64-lab-4.0.2"]);
        let arm = strings(&["img:aarch64-latest", "img:aarch64-lab-4.0.2"]);
        write_tags_file(dir.path(), "x86_64", "img", &x86).unwrap();
        write_tags_file(dir.path(), "aarch64", "img", &arm).unwrap();
        let runner = Arc::new(ScriptedRunner::new().fail("docker pull img:aarch64-latest", 1, "manifest unknown"));
        let docker = DockerCli::new(runner.clone(), "docker");

        let err = merge_tags(&docker, "img", dir.path(), &MergeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TagError::CommandFailed { .. }));
        assert!(runner.calls_starting_with("docker manifest").is_empty());
        assert!(runner.calls_starting_with("docker pull img:x86_64-lab").is_empty());
    }
}

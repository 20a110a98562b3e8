//! `ARG BASE_IMAGE=` convention.
//!
//! Downstream Dockerfiles name their parent in a single
//! `ARG BASE_IMAGE=<reference>` line. Only that line is read; nothing else
//! in the file is interpreted.

use stacks_tag_core::error::{Result, TagError};

const BASE_IMAGE_ARG: &str = "ARG BASE_IMAGE=";

/// Value of the first `ARG BASE_IMAGE=` line.
pub fn base_image_from_dockerfile(content: &str) -> Result<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix(BASE_IMAGE_ARG))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            TagError::parse("Dockerfile", format!("no `{}<image>` line found", BASE_IMAGE_ARG))
        })
}

/// Short parent image name for a base image reference.
///
/// `quay.io/jupyter/scipy-notebook` → `scipy-notebook`. A pinned reference
/// such as `docker.io/jupyter/base-notebook:notebook-6.5.4` has no parent
/// in the current build and yields an empty string.
pub fn short_parent_name(base_image: &str) -> String {
    let short = base_image.rsplit('/').next().unwrap_or(base_image);
    if short.contains(':') {
        String::new()
    } else {
        short.to_string()
    }
}

//! Tag computation and per-architecture tags files.
//!
//! A tagging pass starts one container from the freshly built image, runs
//! every effective tagger against it in order, removes the container, and
//! records one full tag per line in `<prefix>-<short-image-name>.txt`.

use std::path::{Path, PathBuf};

use stacks_tag_core::error::{Result, TagError};

use crate::docker::DockerCli;
use crate::hierarchy::ImageHierarchy;
use crate::taggers::{TagContext, Tagger};

/// Tag suffix that always accompanies the version tags.
pub const LATEST_TAG: &str = "latest";

/// Split an image reference into repository and tag.
///
/// The tag separator is the last `:` after the last `/`, so registry ports
/// (`localhost:5000/img`) are left alone.
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    let search_from = reference.rfind('/').map(|p| p + 1).unwrap_or(0);
    match reference[search_from..].rfind(':') {
        Some(pos) => {
            let colon = search_from + pos;
            (&reference[..colon], Some(&reference[colon + 1..]))
        }
        None => (reference, None),
    }
}

/// Path of the tags file for one prefix and image.
pub fn tags_file_path(tags_dir: &Path, tags_prefix: &str, short_image_name: &str) -> PathBuf {
    tags_dir.join(format!("{}-{}.txt", tags_prefix, short_image_name))
}

/// Run every tagger against one container and build the full tag list.
///
/// The first entry is always `<image>:<prefix>-latest`; every tagger then
/// contributes one independent tag `<image>:<prefix>-<value>`.
pub async fn compute_tags(
    image: &str,
    ctx: &TagContext<'_>,
    taggers: &[Tagger],
    tags_prefix: &str,
) -> Result<Vec<String>> {
    let (repository, _) = split_reference(image);
    let mut tags = Vec::with_capacity(taggers.len() + 1);
    tags.push(format!("{}:{}-{}", repository, tags_prefix, LATEST_TAG));
    for tagger in taggers {
        let value = tagger.tag_value(ctx).await?;
        tags.push(format!("{}:{}-{}", repository, tags_prefix, value));
    }
    Ok(tags)
}

/// Write tags one per line, replacing any existing file.
pub fn write_tags_file(
    tags_dir: &Path,
    tags_prefix: &str,
    short_image_name: &str,
    tags: &[String],
) -> Result<PathBuf> {
    std::fs::create_dir_all(tags_dir)?;
    let path = tags_file_path(tags_dir, tags_prefix, short_image_name);
    let mut content = String::new();
    for tag in tags {
        content.push_str(tag);
        content.push('\n');
    }
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), count = tags.len(), "Wrote tags file");
    Ok(path)
}

/// Read a tags file; a missing file is `MissingTagsFile`.
pub fn read_tags_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TagError::MissingTagsFile {
                path: path.to_path_buf(),
            }
        } else {
            TagError::IoError(e)
        }
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parameters of one tagging pass.
#[derive(Debug, Clone)]
pub struct TagRun {
    /// Hierarchy key, e.g. `scipy-notebook`
    pub short_image_name: String,
    /// Built image to probe, e.g. `quay.io/jupyter/scipy-notebook`
    pub image: String,
    /// `<platform>` or `<platform>-<variant>`
    pub tags_prefix: String,
    /// Directory receiving the tags file
    pub tags_dir: PathBuf,
    /// Git checkout the image was built from
    pub repo_root: PathBuf,
}

/// Compute the tags of a built image and record them in its tags file.
///
/// The probe container is always stopped and removed, also when a tagger
/// fails; the tagger error, wrapped in `Tagging` with the image name, takes
/// precedence over a cleanup error.
pub async fn tag_image(
    docker: &DockerCli,
    hierarchy: &ImageHierarchy,
    run: &TagRun,
) -> Result<(PathBuf, Vec<String>)> {
    let taggers = hierarchy.effective_taggers(&run.short_image_name)?;
    tracing::info!(
        image = %run.image,
        prefix = %run.tags_prefix,
        taggers = taggers.len(),
        "Calculating tags"
    );

    let container = docker.run_detached(&run.image).await?;
    let ctx = TagContext {
        docker,
        container: &container,
        repo_root: &run.repo_root,
    };
    let computed = compute_tags(&run.image, &ctx, &taggers, &run.tags_prefix).await;
    let cleanup = docker.stop_and_remove(&container).await;

    let tags = match (computed, cleanup) {
        (Ok(tags), Ok(())) => tags,
        (Err(e), cleanup) => {
            if let Err(cleanup_err) = cleanup {
                tracing::error!(container = %container.id, error = %cleanup_err, "Failed to remove probe container");
            }
            tracing::error!(image = %run.image, error = %e, "Tagging failed");
            return Err(TagError::Tagging {
                image: run.image.clone(),
                source: Box::new(e),
            });
        }
        (Ok(_), Err(e)) => return Err(e),
    };

    let path = write_tags_file(&run.tags_dir, &run.tags_prefix, &run.short_image_name, &tags)?;
    Ok((path, tags))
}

/// Tag `source_image` with every tag recorded in `tags_file`, optionally pushing each.
pub async fn apply_tags(
    docker: &DockerCli,
    source_image: &str,
    tags_file: &Path,
    push: bool,
) -> Result<Vec<String>> {
    let tags = read_tags_file(tags_file)?;
    for tag in &tags {
        docker.tag(source_image, tag).await?;
        if push {
            docker.push(tag).await?;
        }
    }
    tracing::info!(image = source_image, count = tags.len(), push, "Applied tags");
    Ok(tags)
}

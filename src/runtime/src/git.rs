//! Host-side git queries.

use std::path::Path;

use stacks_tag_core::error::{Result, TagError};

use crate::process::CommandRunner;

/// Length of the abbreviated commit SHA used in tags.
pub const SHORT_SHA_LEN: usize = 12;

/// Full commit hash of `HEAD` in the checkout at `repo_root`.
pub async fn commit_hash(runner: &dyn CommandRunner, repo_root: &Path) -> Result<String> {
    let args = vec![
        "-C".to_string(),
        repo_root.display().to_string(),
        "rev-parse".to_string(),
        "HEAD".to_string(),
    ];
    let output = runner.run("git", &args).await?;
    parse_commit_hash(&output.stdout)
}

/// Abbreviated commit hash, as used by the SHA tag.
pub async fn short_commit_hash(runner: &dyn CommandRunner, repo_root: &Path) -> Result<String> {
    let hash = commit_hash(runner, repo_root).await?;
    Ok(hash[..SHORT_SHA_LEN].to_string())
}

pub(crate) fn parse_commit_hash(stdout: &str) -> Result<String> {
    let hash = stdout.trim();
    if hash.len() < SHORT_SHA_LEN || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TagError::parse(
            "SHATagger",
            format!("unexpected `git rev-parse HEAD` output: {:?}", hash),
        ));
    }
    Ok(hash.to_string())
}

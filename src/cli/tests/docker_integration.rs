//! Integration test: tag and inspect real docker-stacks images.
//!
//! ## Prerequisites
//!
//! - A running docker daemon and the `docker` CLI on `PATH`
//! - Internet access (to pull `quay.io/jupyter/base-notebook`)
//! - `git` on `PATH`; the workspace must be a git checkout
//!
//! ## Running
//!
//! ```bash
//! cargo test -p stacks-tag-cli --test docker_integration -- --ignored --nocapture
//! ```
//!
//! Tests are `#[ignore]` by default because they require docker and
//! network access.

use std::process::{Command, Output};

fn stacks_tag(args: &[&str]) -> Output {
    eprintln!("    $ stacks-tag {}", args.join(" "));
    Command::new(env!("CARGO_BIN_EXE_stacks-tag"))
        .args(args)
        .stderr(std::process::Stdio::inherit())
        .output()
        .unwrap_or_else(|e| panic!("Failed to run `stacks-tag {}`: {}", args.join(" "), e))
}

fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    std::path::Path::new(manifest_dir)
        .join("../..")
        .to_string_lossy()
        .to_string()
}

fn pull(image: &str) {
    let status = Command::new("docker")
        .args(["pull", image])
        .status()
        .expect("docker should be installed");
    assert!(status.success(), "docker pull {image} failed");
}

#[test]
#[ignore]
fn test_tag_base_notebook() {
    pull("quay.io/jupyter/base-notebook");
    let dir = tempfile::tempdir().unwrap();
    let tags_dir = dir.path().to_string_lossy().to_string();
    let repo = workspace_root();

    let output = stacks_tag(&[
        "tag",
        "--short-image-name",
        "base-notebook",
        "--tags-dir",
        &tags_dir,
        "--platform",
        "x86_64",
        "--repository-root",
        &repo,
    ]);
    assert!(output.status.success());

    let content = std::fs::read_to_string(dir.path().join("x86_64-base-notebook.txt")).unwrap();
    let tags: Vec<&str> = content.lines().collect();
    assert_eq!(tags.len(), 6);
    assert_eq!(tags[0], "quay.io/jupyter/base-notebook:x86_64-latest");
    assert!(tags.iter().any(|t| t.contains(":x86_64-python-3.")));
    assert!(tags.iter().any(|t| t.contains(":x86_64-lab-")));
}

#[test]
#[ignore]
fn test_check_imports_base_notebook() {
    pull("quay.io/jupyter/base-notebook");
    let output = stacks_tag(&["check-imports", "base-notebook"]);
    assert!(output.status.success());
}

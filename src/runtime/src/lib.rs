//! Stacks Tag Runtime - image tagging engine.
//!
//! Runs version probes inside freshly built containers, turns the results
//! into per-architecture tags files, and merges those into multi-arch
//! manifests. Every external action shells out to the `docker` and `git`
//! command-line tools through [`CommandRunner`].

pub mod docker;
pub mod dockerfile;
pub mod git;
pub mod hierarchy;
pub mod merge;
pub mod packages;
pub mod process;
pub mod tags;
pub mod taggers;

// Re-export common types
pub use docker::{ContainerHandle, DockerCli};
pub use dockerfile::{base_image_from_dockerfile, short_parent_name};
pub use hierarchy::{ImageDescription, ImageHierarchy};
pub use merge::{canonical_tags, merge_tags, MergeOptions};
pub use packages::{PackageHelper, PackageVersions, UpdatablePackage};
pub use process::{CommandOutput, CommandRunner, SystemRunner};
pub use tags::{
    apply_tags, compute_tags, read_tags_file, split_reference, tag_image, tags_file_path,
    write_tags_file, TagRun,
};
pub use taggers::{TagContext, Tagger};

/// Stacks Tag Runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub(crate) mod testing;

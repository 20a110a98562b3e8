//! `stacks-tag base-image` command: read `ARG BASE_IMAGE=` from a Dockerfile.

use std::path::PathBuf;

use clap::Args;
use stacks_tag_runtime::dockerfile::{base_image_from_dockerfile, short_parent_name};

#[derive(Args)]
pub struct BaseImageArgs {
    /// Dockerfile to read
    pub dockerfile: PathBuf,

    /// Print the short parent image name instead of the full reference
    #[arg(long)]
    pub short: bool,
}

pub async fn execute(args: BaseImageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.dockerfile)
        .map_err(|e| format!("failed to read {}: {}", args.dockerfile.display(), e))?;
    let base_image = base_image_from_dockerfile(&content)?;

    if args.short {
        println!("{}", short_parent_name(&base_image));
    } else {
        println!("{}", base_image);
    }
    Ok(())
}

//! `stacks-tag merge` command: merge x86_64 and aarch64 tags into manifests.

use std::path::PathBuf;

use clap::Args;
use stacks_tag_runtime::merge::{merge_tags, MergeOptions};

use super::Context;

#[derive(Args)]
pub struct MergeArgs {
    /// Short image name to merge tags for
    #[arg(long)]
    pub short_image_name: String,

    /// Directory with the saved tags files
    #[arg(long)]
    pub tags_dir: PathBuf,

    /// Image variant (`default` for none)
    #[arg(long, default_value = "default")]
    pub variant: String,

    /// Push each manifest after creating it
    #[arg(long)]
    pub push: bool,
}

pub async fn execute(ctx: &Context, args: MergeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = MergeOptions {
        platforms: ctx.config.platforms.clone(),
        variant: Some(args.variant).filter(|v| v != "default"),
        push: args.push,
    };
    let merged = merge_tags(&ctx.docker, &args.short_image_name, &args.tags_dir, &options).await?;
    for tag in &merged {
        println!("{}", tag);
    }
    Ok(())
}

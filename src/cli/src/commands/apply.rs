//! `stacks-tag apply` command: apply recorded tags to the built image.

use std::path::PathBuf;

use clap::Args;
use stacks_tag_core::Platform;
use stacks_tag_runtime::tags::{apply_tags, tags_file_path};

use super::Context;

#[derive(Args)]
pub struct ApplyArgs {
    /// Short image name, e.g. `scipy-notebook`
    #[arg(long)]
    pub short_image_name: String,

    /// Directory holding the tags file
    #[arg(long)]
    pub tags_dir: PathBuf,

    /// Image variant (`default` for none)
    #[arg(long, default_value = "default")]
    pub variant: String,

    /// Platform the image was built for (default: host)
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Registry (overrides the configuration)
    #[arg(long)]
    pub registry: Option<String>,

    /// Registry owner (overrides the configuration)
    #[arg(long)]
    pub owner: Option<String>,

    /// Push every tag after applying it
    #[arg(long)]
    pub push: bool,
}

pub async fn execute(ctx: &Context, args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let platform = super::resolve_platform(args.platform)?;
    let prefix = platform.tags_prefix(Some(args.variant.as_str()));
    let path = tags_file_path(&args.tags_dir, &prefix, &args.short_image_name);
    let image = source_image(ctx, &args);

    let tags = apply_tags(&ctx.docker, &image, &path, args.push).await?;
    for tag in &tags {
        println!("{}", tag);
    }
    Ok(())
}

/// Built image the recorded tags are applied to.
pub(super) fn source_image(ctx: &Context, args: &ApplyArgs) -> String {
    let mut config = ctx.config.clone();
    if let Some(registry) = &args.registry {
        config.registry = registry.clone();
    }
    if let Some(owner) = &args.owner {
        config.owner = owner.clone();
    }
    config.image_name(&args.short_image_name)
}

//! `stacks-tag tag` command: calculate tags of a built image.
//!
//! Starts a container from the freshly built image, runs every effective
//! tagger against it and writes `<prefix>-<short-image-name>.txt` into the
//! tags directory.

use std::path::PathBuf;

use clap::Args;
use stacks_tag_core::Platform;
use stacks_tag_runtime::tags::{tag_image, TagRun};

use super::Context;

#[derive(Args)]
pub struct TagArgs {
    /// Short image name, e.g. `scipy-notebook`
    #[arg(long)]
    pub short_image_name: String,

    /// Directory the tags file is written to
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

    /// Git checkout the image was built from
    #[arg(long)]
    pub repository_root: Option<PathBuf>,
}

pub async fn execute(ctx: &Context, args: TagArgs) -> Result<(), Box<dyn std::error::Error>> {
    let platform = super::resolve_platform(args.platform)?;
    let mut config = ctx.config.clone();
    if let Some(registry) = args.registry {
        config.registry = registry;
    }
    if let Some(owner) = args.owner {
        config.owner = owner;
    }

    let hierarchy = ctx.hierarchy()?;
    let run = TagRun {
        image: config.image_name(&args.short_image_name),
        short_image_name: args.short_image_name,
        tags_prefix: platform.tags_prefix(Some(args.variant.as_str())),
        tags_dir: args.tags_dir,
        repo_root: args.repository_root.unwrap_or(config.repository_root),
    };

    let (path, tags) = tag_image(&ctx.docker, &hierarchy, &run).await?;
    for tag in &tags {
        println!("{}", tag);
    }
    tracing::info!(path = %path.display(), "Tags file written");
    Ok(())
}

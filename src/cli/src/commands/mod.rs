//! CLI command definitions and dispatch.

mod apply;
mod base_image;
mod check_imports;
mod merge;
mod outdated;
mod tag;
mod taggers;
mod version;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stacks_tag_core::{Platform, TaggingConfig};
use stacks_tag_runtime::{DockerCli, ImageHierarchy, SystemRunner};

/// Tag docker-stacks images and merge multi-arch manifests.
#[derive(Parser)]
#[command(name = "stacks-tag", version, about)]
pub struct Cli {
    /// YAML tagging configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Container runtime binary (overrides the configuration)
    #[arg(long, global = true)]
    pub docker: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Calculate tags of a built image and write its tags file
    Tag(tag::TagArgs),
    /// Apply the tags recorded in a tags file to the built image
    Apply(apply::ApplyArgs),
    /// Merge per-architecture tags into multi-arch manifests
    Merge(merge::MergeArgs),
    /// Show the effective tagger list of an image
    Taggers(taggers::TaggersArgs),
    /// Print the base image declared in a Dockerfile
    BaseImage(base_image::BaseImageArgs),
    /// Report conda packages with newer versions available
    Outdated(outdated::OutdatedArgs),
    /// Import every requested package inside an image
    CheckImports(check_imports::CheckImportsArgs),
    /// Show version information
    Version(version::VersionArgs),
}

/// Shared state built from global flags and the configuration file.
pub struct Context {
    pub config: TaggingConfig,
    pub docker: DockerCli,
}

impl Context {
    fn load(config: Option<&PathBuf>, docker: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match config {
            Some(path) => TaggingConfig::load(path)?,
            None => TaggingConfig::default(),
        };
        if let Some(docker) = docker {
            config.docker = docker;
        }
        let docker = DockerCli::new(Arc::new(SystemRunner), config.docker.clone());
        Ok(Self { config, docker })
    }

    /// Configured image hierarchy, or the built-in one.
    pub fn hierarchy(&self) -> Result<ImageHierarchy, Box<dyn std::error::Error>> {
        let hierarchy = match &self.config.images {
            Some(images) => ImageHierarchy::from_config(images)?,
            None => ImageHierarchy::builtin()?,
        };
        Ok(hierarchy)
    }
}

/// Platform from a flag, falling back to the host architecture.
pub(crate) fn resolve_platform(
    platform: Option<Platform>,
) -> Result<Platform, Box<dyn std::error::Error>> {
    platform
        .or_else(Platform::host)
        .ok_or_else(|| {
            format!(
                "cannot infer platform from host architecture '{}', pass --platform",
                std::env::consts::ARCH
            )
            .into()
        })
}

/// Full reference for a short image name; references containing `/` pass through.
pub(crate) fn image_reference(ctx: &Context, image: &str) -> String {
    if image.contains('/') {
        image.to_string()
    } else {
        ctx.config.image_name(image)
    }
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(cli.config.as_ref(), cli.docker)?;
    match cli.command {
        Command::Tag(args) => tag::execute(&ctx, args).await,
        Command::Apply(args) => apply::execute(&ctx, args).await,
        Command::Merge(args) => merge::execute(&ctx, args).await,
        Command::Taggers(args) => taggers::execute(&ctx, args).await,
        Command::BaseImage(args) => base_image::execute(args).await,
        Command::Outdated(args) => outdated::execute(&ctx, args).await,
        Command::CheckImports(args) => check_imports::execute(&ctx, args).await,
        Command::Version(args) => version::execute(args).await,
    }
}

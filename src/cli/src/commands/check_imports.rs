//! `stacks-tag check-imports` command: import every requested package.
//!
//! Only packages explicitly requested with `mamba install` are checked,
//! dependencies are not. Every failing import is reported before exiting
//! with an error.

use clap::Args;
use stacks_tag_runtime::packages::PackageHelper;

use super::Context;

#[derive(Args)]
pub struct CheckImportsArgs {
    /// Short image name or full image reference
    pub image: String,
}

pub async fn execute(ctx: &Context, args: CheckImportsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let image = super::image_reference(ctx, &args.image);

    let helper = PackageHelper::start(&ctx.docker, &image).await?;
    let checked = helper.check_imports().await;
    helper.finish().await?;

    let checked = checked?;
    println!("{} packages imported successfully", checked.len());
    Ok(())
}

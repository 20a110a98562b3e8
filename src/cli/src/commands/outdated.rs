//! `stacks-tag outdated` command: report conda packages that could be updated.

use clap::Args;
use stacks_tag_runtime::packages::{PackageHelper, UpdatablePackage};

use super::Context;
use crate::output;

#[derive(Args)]
pub struct OutdatedArgs {
    /// Short image name or full image reference
    pub image: String,

    /// Include dependencies, not only explicitly requested packages
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(ctx: &Context, args: OutdatedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let image = super::image_reference(ctx, &args.image);
    let requested_only = !args.all;

    let helper = PackageHelper::start(&ctx.docker, &image).await?;
    let report = report(&helper, requested_only).await;
    helper.finish().await?;
    let (updatable, summary) = report?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&updatable)?);
        return Ok(());
    }

    let mut table = output::new_table(&["PACKAGE", "CURRENT", "NEWEST"]);
    for package in &updatable {
        table.add_row(vec![&package.package, &package.current, &package.newest]);
    }
    println!("{table}");
    println!("{summary}");
    Ok(())
}

async fn report(
    helper: &PackageHelper<'_>,
    requested_only: bool,
) -> stacks_tag_core::Result<(Vec<UpdatablePackage>, String)> {
    let updatable = helper.check_updatable(requested_only).await?;
    let summary = helper.outdated_summary(&updatable, requested_only).await?;
    Ok((updatable, summary))
}

//! `stacks-tag version` command.

use clap::Args;

#[derive(Args)]
pub struct VersionArgs;

pub async fn execute(_args: VersionArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("stacks-tag version {}", stacks_tag_core::VERSION);
    Ok(())
}

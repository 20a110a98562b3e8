//! `stacks-tag taggers` command: show the effective tagger list of an image.

use clap::Args;

use super::Context;
use crate::output;

#[derive(Args)]
pub struct TaggersArgs {
    /// Short image name, e.g. `pyspark-notebook`
    pub image: String,
}

pub async fn execute(ctx: &Context, args: TaggersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let hierarchy = ctx.hierarchy()?;
    let lineage = hierarchy.lineage(&args.image)?;

    let mut table = output::new_table(&["#", "TAGGER", "FROM"]);
    let mut index = 1;
    for image in &lineage {
        for tagger in &hierarchy.get(image)?.taggers {
            table.add_row(vec![index.to_string(), tagger.to_string(), image.to_string()]);
            index += 1;
        }
    }

    println!("{}", lineage.join(" -> "));
    println!("{table}");
    Ok(())
}

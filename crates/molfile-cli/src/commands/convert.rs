use crate::cli::ConvertArgs;
use crate::config::AppConfig;
use crate::error::Result;
use molfile::workflows::convert::{self, ConvertOptions};
use tracing::info;

pub fn run(args: &ConvertArgs, config: &AppConfig) -> Result<()> {
    let mut write = config.write.clone();
    if args.no_timestamp {
        write.header.timestamp = None;
    }

    let options = ConvertOptions {
        read: config.read.clone(),
        write,
        rename: args.name.clone(),
        drop_bonds: args.no_bonds,
    };

    info!("Converting {:?} to {:?}", &args.input, &args.output);
    let report = convert::run(&args.input, &args.output, &options)?;

    println!(
        "✓ Wrote '{}' ({} atoms, {} bonds) to {}",
        report.name,
        report.atom_count,
        report.bond_count,
        args.output.display()
    );
    Ok(())
}

mod filter;
mod group;
mod inspect;
mod summary;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lsif-bundle",
    version,
    about = "Groups correlated LSIF data into sharded bundle tables",
    long_about = "lsif-bundle turns the correlated state of one LSIF dump into the tables a \
                  code intelligence bundle is made of: per-document views, sharded result \
                  chunks, moniker location indexes and package (reference) records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group a correlated state into a bundle
    #[command(
        long_about = "Loads a correlated state from JSON, groups it and prints a summary. \
                            With --output the materialized bundle is written to disk."
    )]
    Group {
        /// Correlated state as JSON
        #[arg(value_name = "STATE_JSON")]
        state: PathBuf,
        /// Dump id stamped onto packages and package references
        #[arg(long, default_value_t = 0)]
        dump_id: i64,
        /// Where to write the bundle
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Write the bundle as JSON instead of compressed MessagePack
        #[arg(long)]
        json: bool,
        /// Bound on items buffered per table stream
        #[arg(long, value_name = "N")]
        channel_capacity: Option<usize>,
        /// Reject states with dangling ids instead of skipping them
        #[arg(long)]
        strict: bool,
    },
    /// Print the summary of a written bundle
    Inspect {
        /// Bundle written by `group --output`
        #[arg(value_name = "BUNDLE_FILE")]
        bundle: PathBuf,
    },
    /// Test whether an identifier may be imported from a package
    Filter {
        #[arg(value_name = "BUNDLE_FILE")]
        bundle: PathBuf,
        /// Moniker scheme of the package
        #[arg(long)]
        scheme: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        version: String,
        #[arg(value_name = "IDENTIFIER")]
        identifier: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_dir = lsif_bundle_core::logging::log_dir();
    let _guard = lsif_bundle_core::logging::init_logging("cli", &log_dir, true)?;

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Group {
            state,
            dump_id,
            output,
            json,
            channel_capacity,
            strict,
        } => rt.block_on(group::run(group::GroupArgs {
            state,
            dump_id,
            output,
            json,
            channel_capacity,
            strict,
        })),
        Commands::Inspect { bundle } => inspect::run(bundle),
        Commands::Filter {
            bundle,
            scheme,
            name,
            version,
            identifier,
        } => filter::run(bundle, &scheme, &name, &version, &identifier),
    }
}

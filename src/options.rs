use std::path::PathBuf;

use spacepack::StrategyKind;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Plan how a list of boxes fills a set of 3D containers")]
pub struct Options {
    #[structopt(flatten)]
    pub global: GlobalOptions,

    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub struct GlobalOptions {
    /// The placement strategy to use, overriding the one named in the job
    /// file.
    ///
    /// Options: first-fit, breadth-first, best-fit, worst-fit, deepest-first
    #[structopt(long, global = true)]
    pub strategy: Option<StrategyKind>,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Pack every item of a job file and write a JSON report of where each
    /// item ended up.
    Pack(PackOptions),

    /// Pack a job file and print the space tree of a single container.
    Inspect(InspectOptions),
}

#[derive(Debug, StructOpt)]
pub struct PackOptions {
    /// The path to the job file to pack.
    pub job: PathBuf,

    /// Where to write the report. Defaults to stdout.
    #[structopt(long, short)]
    pub output: Option<PathBuf>,

    /// Exit with an error if any item could not be placed.
    #[structopt(long)]
    pub fail_on_unplaced: bool,
}

#[derive(Debug, StructOpt)]
pub struct InspectOptions {
    /// The path to the job file to pack.
    pub job: PathBuf,

    /// The ID of the container to print.
    #[structopt(long, default_value = "1")]
    pub container: u32,
}

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod common;
mod join;
mod logging;
mod pretty;

#[derive(Parser)]
#[command(
    name = "jsonjoin",
    version,
    about = "Join JSON record arrays on a key field.",
    long_about = "jsonjoin merges two JSON arrays of objects the way a relational join merges tables: records whose key fields are equal are combined into one object, and outer joins also keep the records that matched nothing. Inputs are files or standard input; results can be written as JSON, JSON lines, a table or TSV."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join two JSON files on matching keys
    Join(join::JoinArgs),
    /// Pretty-print a JSON record array as an aligned table
    Pretty(pretty::PrettyArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Join(args) => join::run(args),
        Commands::Pretty(args) => pretty::run(args),
    }
}

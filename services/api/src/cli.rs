use crate::report::{run_parts, run_recommend, PartsArgs, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use supplier_rank::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Supplier Recommendation Analytics",
    about = "Rank suppliers for a part from purchase-order history",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the recommended supplier and comparative matrix for a part
    Recommend(RecommendArgs),
    /// List part numbers and analysis years present in the history
    Parts(PartsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the purchase-order history CSV
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Parts(args) => run_parts(args),
    }
}

use crate::commands::{run_edit, run_generate, EditArgs, GenerateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rota::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "rotagen",
    about = "Generate and maintain weekend/week duty rotas",
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
    /// Generate a rota and print it, optionally saving CSV and JSON copies
    Generate(GenerateArgs),
    /// Apply a manual edit to a saved rota document
    Edit(EditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Generate(args) => run_generate(args),
        Command::Edit(args) => run_edit(args),
    }
}

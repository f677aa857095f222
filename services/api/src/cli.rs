use crate::commands::{run_batch, run_classify, run_methodology, BatchArgs, ClassifyArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use docintel::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Cannabis Document Intelligence",
    about = "Score municipal documents for cannabis business relevance and route them to follow-up workflows",
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
    /// Classify a single .txt, .pdf or .docx document
    Classify(ClassifyArgs),
    /// Classify every supported document under a directory
    Batch(BatchArgs),
    /// Run the end-to-end demo over the bundled sample documents
    Demo(DemoArgs),
    /// Print the scoring methodology for the configured tables
    Methodology,
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
        Command::Classify(args) => run_classify(args),
        Command::Batch(args) => run_batch(args),
        Command::Demo(args) => run_demo(args),
        Command::Methodology => run_methodology(),
    }
}

use clap::{Parser, Subcommand};
use devsync::app::App;
use devsync::constants::schedule::DEFAULT_SYNC_INTERVAL_SECS;
use devsync::errors::SyncError;

#[derive(Parser)]
#[command(
    name = "devsync",
    version,
    about = "Keep the local SSH config in sync with running dev workspaces"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single reconciliation pass
    Sync,
    /// Run reconciliation passes on a fixed interval
    Daemon {
        #[arg(long, default_value_t = DEFAULT_SYNC_INTERVAL_SECS)]
        interval_secs: u64,
    },
    /// Print owned entries and their ports without writing
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("devsync: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SyncError> {
    let cli = Cli::parse();
    let app = App::initialize();
    match cli.command.unwrap_or(Command::Sync) {
        Command::Sync => app.run_sync().await,
        Command::Daemon { interval_secs } => app.run_daemon(interval_secs).await,
        Command::Status => app.print_status(),
    }
}

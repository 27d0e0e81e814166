use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod host;

#[derive(Parser)]
#[command(name = "choreboard", version, about = "Household chore board")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chore management
    Chore {
        #[command(subcommand)]
        action: commands::chore::ChoreAction,
    },
    /// Household member management
    User {
        #[command(subcommand)]
        action: commands::user::UserAction,
    },
    /// Run a raw request query, e.g. "action=toggle&index=0"
    Request {
        query: String,
    },
    /// Show the status indicator
    Status {
        /// Report as if the network were down
        #[arg(long)]
        offline: bool,
    },
    /// Reset expired completions now
    Sweep,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Serve the request surface over HTTP
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Replay a joystick script against the board
    Simulate {
        /// Script file: one "<ms> <nav> <confirm> <button>" sample per line
        script: std::path::PathBuf,
        /// Apply changes to the saved board instead of a scratch copy
        #[arg(long)]
        commit: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Chore { action } => commands::chore::run(action),
        Commands::User { action } => commands::user::run(action),
        Commands::Request { query } => commands::request::run(&query),
        Commands::Status { offline } => commands::request::status(!offline),
        Commands::Sweep => commands::request::sweep(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Serve { port } => commands::serve::run(port),
        Commands::Simulate { script, commit } => commands::simulate::run(&script, commit),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

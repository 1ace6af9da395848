use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "matrixx", version, about = "Matrixx career assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sidebar tools
    Tools {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show recent chats
    History {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Interview practice
    Interview {
        #[command(subcommand)]
        action: commands::interview::InterviewAction,
    },
    /// Interactive chat session
    Chat(commands::chat::ChatArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays clean for `--json` output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MATRIXX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Tools { json } => commands::tools::run(json),
        Commands::History { json } => commands::history::run(json),
        Commands::Interview { action } => commands::interview::run(action),
        Commands::Chat(args) => commands::chat::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

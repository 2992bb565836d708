//! memchat CLI - chat sessions with summary-based memory.

use clap::{Parser, Subcommand};
use memchat::cli;
use memchat::config::load_config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc12345)"
/// - Dirty working directory: "0.1.0-dev (abc12345-dirty)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("MEMCHAT_GIT_HASH");
    const IS_RELEASE: &str = env!("MEMCHAT_IS_RELEASE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "memchat")]
#[command(author, version = version(), about = "Chat sessions with summary-based memory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new session and print its id.
    New {
        /// Start fresh, without summaries of earlier sessions.
        #[arg(long)]
        no_memory: bool,
    },

    /// Append a message to an open session.
    Append {
        /// Session ID.
        session_id: String,

        /// Message role (user, assistant, system).
        role: String,

        /// Message text.
        content: String,
    },

    /// Close a session and print its summary.
    Close {
        /// Session ID.
        session_id: String,
    },

    /// Send a user message and record the configured responder's reply.
    Chat {
        /// Session ID.
        session_id: String,

        /// Message text.
        content: String,
    },

    /// Show a stored session as JSON.
    Show {
        /// Session ID.
        session_id: String,
    },

    /// Print the model context for a session, including memory.
    Context {
        /// Session ID.
        session_id: String,
    },

    /// List all stored sessions.
    List,

    /// List sessions that are still open.
    Active,

    /// Delete a session (its summary is kept).
    Delete {
        /// Session ID.
        session_id: String,
    },

    /// Show session summaries, most recent first.
    Summaries {
        /// Maximum number of summaries to show. Defaults to 20.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Remove all but the most recent sessions.
    Clean {
        /// Number of sessions to keep. Defaults to the configured keep_count.
        #[arg(long)]
        keep: Option<usize>,
    },

    /// Show storage statistics.
    Stats {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("MEMCHAT_LOG").unwrap_or_else(|_| EnvFilter::new("memchat=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> memchat::Result<()> {
    let config = load_config()?;
    let store = cli::open_store(&config)?;

    match command {
        Commands::New { no_memory } => cli::session::run_new(&store, !no_memory),
        Commands::Append {
            session_id,
            role,
            content,
        } => cli::session::run_append(&store, &session_id, &role, &content),
        Commands::Close { session_id } => cli::session::run_close(&store, &session_id),
        Commands::Chat {
            session_id,
            content,
        } => {
            let responder = config.responder.build()?;
            cli::chat::run(&store, responder.as_ref(), &session_id, &content)
        }
        Commands::Show { session_id } => cli::show::run(&store, &session_id),
        Commands::Context { session_id } => cli::context::run(&store, &session_id),
        Commands::List => cli::list::run(&store),
        Commands::Active => cli::list::run_active(&store),
        Commands::Delete { session_id } => cli::session::run_delete(&store, &session_id),
        Commands::Summaries { limit } => cli::list::run_summaries(&store, limit),
        Commands::Clean { keep } => {
            cli::clean::run(&store, keep.unwrap_or(config.cleanup.keep_count))
        }
        Commands::Stats { json } => cli::stats::run(&store, json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("memchat: error: {e}");
            ExitCode::FAILURE
        }
    }
}

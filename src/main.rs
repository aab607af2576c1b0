use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use n8n_workflow_manager::{Config, cli};
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// n8n Workflow Manager: --{n8nsync}-> keeps a directory of workflow JSON files in sync with a remote n8n instance
#[derive(Parser)]
#[command(name = "n8nsync", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Directory of workflow JSON files (overrides N8N_WORKFLOWS_DIR)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test authentication against the n8n remote
    Auth,

    /// List remote workflows and their activation state
    List,

    /// Import or update all local workflow files on the remote
    Import,

    /// Activate workflows on the remote
    Activate {
        /// Activate every remote workflow, not just the ones this
        /// project's files define
        #[arg(long)]
        all: bool,
    },

    /// Import all workflows, then activate everything
    Setup,

    /// Delete all remote workflows, re-import, activate and verify
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; configuration may come from the
    // process environment directly.
    let _ = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let config = Config::from_env()?;
    let workflows_dir = cli.dir.unwrap_or_else(|| config.workflows_dir.clone());
    let client = cli::load_client(&config)?;

    match cli.command {
        Commands::Auth => cli::auth(&client).await,
        Commands::List => cli::list(&client).await,
        Commands::Import => cli::import_all(&client, &workflows_dir).await,
        Commands::Activate { all } => match all {
            true => cli::activate_all(&client).await,
            false => cli::activate_project(&client, &workflows_dir).await,
        },
        Commands::Setup => cli::setup(&client, &workflows_dir).await,
        Commands::Reset => cli::full_reset(&client, &workflows_dir).await,
    }
}

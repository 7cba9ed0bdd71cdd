mod config_cmd;
mod convert_cmd;
mod doctor_cmd;
mod serve_cmd;
mod status_cmd;
mod terminal_output;
mod ui_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use inkforge_config::InkForgeConfig;
use logging::LogOptions;

#[derive(Parser)]
#[command(name = "inkforge")]
#[command(about = "InkForge: Markdown in, PDF out")]
#[command(version)]
struct Cli {
    /// Config file (default: $INKFORGE_CONFIG_DIR/config.yaml or ~/.inkforge/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the conversion service
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Open the terminal editor
    Ui {
        /// Markdown file to start from
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Conversion service URL
        #[arg(short, long)]
        server: Option<String>,
    },
    /// Convert one Markdown file through the service
    Convert {
        input: PathBuf,
        /// Where to write the PDF
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Conversion service URL
        #[arg(short, long)]
        server: Option<String>,
    },
    /// Query the service health endpoint
    Status {
        #[arg(short, long)]
        server: Option<String>,
    },
    /// Check config, Chrome, and service reachability
    Doctor,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config as YAML
    Show,
    /// Write a config file populated with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        terminal_output::note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .unwrap_or_else(|| inkforge_config::config_file_path(&inkforge_config::config_dir()));

    match cli.command {
        Commands::Config { action: ConfigAction::Init { force } } => {
            config_cmd::init(&config_path, force).await
        }
        Commands::Config { action: ConfigAction::Show } => {
            let config = inkforge_config::load_and_prepare(&config_path).await?;
            config_cmd::show(&config)
        }
        Commands::Serve { port, bind } => {
            let config = inkforge_config::load_and_prepare(&config_path).await?;
            logging::init_logger(&log_options(&config, true))?;
            serve_cmd::run(config, port, bind).await
        }
        Commands::Ui { file, server } => {
            let config = inkforge_config::load_and_prepare(&config_path).await?;
            let mut options = log_options(&config, false);
            options.dir.get_or_insert_with(|| default_log_dir(&config_path));
            logging::init_logger(&options)?;
            ui_cmd::run(&config, file, server).await
        }
        Commands::Convert { input, output, server } => {
            let config = inkforge_config::load_and_prepare(&config_path).await?;
            logging::init_logger(&quiet_log_options(&config))?;
            convert_cmd::run(&config, &input, output, server).await
        }
        Commands::Status { server } => {
            let config = inkforge_config::load_and_prepare(&config_path).await?;
            logging::init_logger(&quiet_log_options(&config))?;
            status_cmd::run(&config, server).await
        }
        Commands::Doctor => doctor_cmd::run(&config_path).await,
    }
}

fn log_options(config: &InkForgeConfig, console: bool) -> LogOptions {
    LogOptions {
        level: config.log_level().to_string(),
        dir: config.log_dir().cloned(),
        console,
        json_console: config.log_json(),
    }
}

/// One-shot commands print their own output; only warnings reach the console.
fn quiet_log_options(config: &InkForgeConfig) -> LogOptions {
    LogOptions { level: "warn".to_string(), ..log_options(config, true) }
}

/// The terminal UI owns the screen, so its logs always go to a file.
fn default_log_dir(config_path: &Path) -> PathBuf {
    config_path.parent().map(|dir| dir.join("logs")).unwrap_or_else(|| PathBuf::from("logs"))
}

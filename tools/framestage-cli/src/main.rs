//! Framestage CLI: stage bundled frames and hand them to an encoder.
//!
//! Usage:
//!   framestage list                    List assets under the bundle root
//!   framestage stage                   Copy the bundle root into the staging directory
//!   framestage stage-file <ASSET> <DEST>  Copy one asset to an exact path
//!   framestage encode <DIR>            Encode a directory of frames
//!   framestage run                     Stage, then encode
//!   framestage check                   Check encoder and storage availability
//!   framestage config                  Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use framestage_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "framestage",
    about = "Stage bundled images and encode them into a video",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/framestage/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List assets under a bundle root
    List {
        /// Bundle root to enumerate
        #[arg(long)]
        root: Option<String>,

        /// Bundle directory
        #[arg(long)]
        bundle: Option<PathBuf>,
    },

    /// Stage a bundle root into the staging directory
    Stage {
        /// Bundle root to stage
        #[arg(long)]
        root: Option<String>,

        /// Bundle directory
        #[arg(long)]
        bundle: Option<PathBuf>,

        /// Print the staging report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stage a single asset to an exact destination file
    StageFile {
        /// Asset path inside the bundle, e.g. images/a.png
        asset: String,

        /// Destination file
        dest: PathBuf,

        /// Bundle directory
        #[arg(long)]
        bundle: Option<PathBuf>,
    },

    /// Encode a directory of frames into a video
    Encode {
        /// Directory holding the frames
        dir: PathBuf,

        /// Encoder: libx264, nvenc, vaapi, mediacodec
        #[arg(long)]
        codec: Option<String>,
    },

    /// Stage the bundle root, then encode the staged directory
    Run {
        /// Bundle root to stage
        #[arg(long)]
        root: Option<String>,

        /// Bundle directory
        #[arg(long)]
        bundle: Option<PathBuf>,

        /// Encoder: libx264, nvenc, vaapi, mediacodec
        #[arg(long)]
        codec: Option<String>,
    },

    /// Check encoder and storage availability
    Check,

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    framestage_common::logging::init_logging(&config.logging);
    tracing::debug!(
        config = ?cli.config,
        bundle = %config.bundle.path.display(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::List { root, bundle } => commands::list::run(&config, root, bundle),
        Commands::Stage { root, bundle, json } => commands::stage::run(&config, root, bundle, json),
        Commands::StageFile { asset, dest, bundle } => {
            commands::stage_file::run(&config, asset, dest, bundle)
        }
        Commands::Encode { dir, codec } => commands::encode::run(&config, dir, codec),
        Commands::Run { root, bundle, codec } => commands::run::run(&config, root, bundle, codec),
        Commands::Check => commands::check::run(&config),
        Commands::Config { save } => commands::config::run(&config, cli.config, save),
    }
}

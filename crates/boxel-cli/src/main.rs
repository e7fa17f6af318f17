//! `boxel`: box-UV atlas packing and bone/node rig conversion over files.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run `boxel pack model.json -o packed.json --guide guide.png` to pack a model
//! and render its painting guide.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use boxel_config::{CliArgs, Config, default_config_dir};
use boxel_model::DEFAULT_TEXTURE_SIZE;
use clap::{Parser, Subcommand};
use glam::UVec2;

#[derive(Parser, Debug)]
#[command(name = "boxel", version, about = "Box-UV atlas packing and rig conversion")]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assign atlas UVs to every cube and record the atlas size.
    Pack {
        input: PathBuf,
        /// Packed model path (stdout when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the painting guide PNG here.
        #[arg(long)]
        guide: Option<PathBuf>,
    },
    /// Render the painting guide PNG of a packed model.
    Guide {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Convert an absolute bone model into a relative node tree.
    Export {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a relative node tree into an absolute bone model.
    Import {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Input is a list of records linked by parent id.
        #[arg(long)]
        flat: bool,
        /// Atlas width recorded on the model.
        #[arg(long, default_value_t = DEFAULT_TEXTURE_SIZE)]
        texture_width: u32,
        /// Atlas height recorded on the model.
        #[arg(long, default_value_t = DEFAULT_TEXTURE_SIZE)]
        texture_height: u32,
    },
    /// Remap UV origins to a new atlas size.
    Rescale {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Take the new size from this image's dimensions.
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_dir = cli.args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&cli.args);

    let log_dir = config_dir.join("logs");
    boxel_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<(), error::CliError> {
    match command {
        Command::Pack { input, output, guide } => {
            commands::pack(&input, output.as_deref(), guide.as_deref(), config)?;
        }
        Command::Guide { input, output } => {
            commands::guide(&input, &output)?;
        }
        Command::Export { input, output } => {
            commands::export(&input, output.as_deref(), config)?;
        }
        Command::Import {
            input,
            output,
            flat,
            texture_width,
            texture_height,
        } => {
            let texture_size = UVec2::new(texture_width, texture_height);
            commands::import(&input, output.as_deref(), flat, texture_size, config)?;
        }
        Command::Rescale {
            input,
            output,
            image,
            width,
            height,
        } => {
            let size = commands::target_size(image.as_deref(), width, height)?;
            commands::rescale(&input, output.as_deref(), size)?;
        }
    }
    Ok(())
}

//! Freestyle CLI
//!
//! Scenario replay → JSON control output per tick
//! Catalog / config dump

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fs_core::{
    BallPrediction, ControlOutput, ControllerConfig, FreestyleController, QuickChat,
    RecordingChannel, TickPacket, TrickCatalog, TrickKind,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fs_cli")]
#[command(about = "Replay tick scenarios through the freestyle controller", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded scenario and print one JSON line per tick
    Run {
        /// Scenario JSON file (array of {packet, prediction})
        #[arg(long)]
        scenario: PathBuf,

        /// Controller config (JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trick catalog overrides (JSON or YAML)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// RNG seed for trick selection
        #[arg(long)]
        seed: Option<u64>,

        /// Index of the controlled car in each packet
        #[arg(long, default_value_t = 0)]
        car: usize,

        /// Also print quick-chat events
        #[arg(long, default_value = "false")]
        chat: bool,
    },

    /// Print the standard trick catalog
    Catalog {
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },

    /// Print the default controller config as YAML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

/// One recorded tick.
#[derive(Debug, Deserialize)]
struct ScenarioTick {
    packet: TickPacket,
    #[serde(default)]
    prediction: BallPrediction,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum OutputLine {
    Controls {
        time: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        trick: Option<TrickKind>,
        controls: ControlOutput,
    },
    Chat {
        time: f32,
        chat: QuickChat,
        text: &'static str,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            catalog,
            seed,
            car,
            chat,
        } => {
            let config = match config {
                Some(path) => ControllerConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => ControllerConfig::from_env_or_default(),
            };
            let catalog = match catalog {
                Some(path) => TrickCatalog::load(&path)
                    .with_context(|| format!("loading catalog {}", path.display()))?,
                None => TrickCatalog::standard(),
            };
            let ticks = load_scenario(&scenario)?;
            tracing::info!(ticks = ticks.len(), car, "replaying {}", scenario.display());

            for line in replay(&ticks, config, catalog, seed, car, chat) {
                println!("{}", serde_json::to_string(&line)?);
            }
        }

        Commands::Catalog { format } => {
            let catalog = TrickCatalog::standard();
            let text = match format {
                Format::Yaml => catalog.to_yaml_string()?,
                Format::Json => catalog.to_json_string()?,
            };
            println!("{}", text);
        }

        Commands::Config => {
            print!("{}", ControllerConfig::default().to_yaml_string()?);
        }
    }

    Ok(())
}

fn load_scenario(path: &Path) -> Result<Vec<ScenarioTick>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

fn replay(
    ticks: &[ScenarioTick],
    config: ControllerConfig,
    catalog: TrickCatalog,
    seed: Option<u64>,
    car: usize,
    chat: bool,
) -> Vec<OutputLine> {
    let mut controller = FreestyleController::new(car, config)
        .with_catalog(catalog)
        .with_channel(RecordingChannel::new());
    if let Some(seed) = seed {
        controller = controller.with_seed(seed);
    }

    let mut lines = Vec::with_capacity(ticks.len());
    for tick in ticks {
        let time = tick.packet.seconds_elapsed;
        let controls = controller.update(&tick.packet, &tick.prediction);

        if chat {
            lines.extend(controller.channel().chats.iter().map(|&quick| OutputLine::Chat {
                time,
                chat: quick,
                text: quick.text(),
            }));
        }
        controller.channel_mut().clear();

        lines.push(OutputLine::Controls {
            time,
            trick: controller.active_trick(),
            controls,
        });
    }
    lines
}

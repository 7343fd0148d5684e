use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "veneer",
    about = concat!(
        "veneer v",
        env!("CARGO_PKG_VERSION"),
        " - loading indicators and optimistic edits for hypermedia UIs"
    ),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this config file instead of ./veneer.toml
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario file and print every effect with its time
    Simulate(SimulateArgs),
    /// Format raw input the way the amount field does while typing
    Mask(MaskArgs),
    /// Parse a displayed amount back into minor units
    Unmask(MaskArgs),
    /// Create, show or edit the config file
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Scenario file (TOML)
    pub path: PathBuf,
    /// Stop time in milliseconds (default: 5s after the last step)
    #[arg(long)]
    pub until_ms: Option<u64>,
}

#[derive(Args)]
pub struct MaskArgs {
    /// Text to format or parse
    #[arg(allow_hyphen_values = true)]
    pub input: String,
    /// ISO code of the currency (default: from config)
    #[arg(long)]
    pub currency: Option<String>,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a commented default config
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config (file plus environment overrides)
    Show,
    /// Set a value, e.g. `config set navigation.overlay_delay_ms 300`
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

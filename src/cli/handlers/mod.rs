mod config;
pub use config::cmd_config;

use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::scenario_io;
use crate::model::{Currency, VeneerConfig};
use crate::ops::currency_mask;
use crate::ops::simulate;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config_path = cli.config.as_deref();

    match cli.command {
        None => Err("no command given (run without arguments for the interactive host)".into()),
        Some(cmd) => match cmd {
            Commands::Simulate(args) => cmd_simulate(args, config_path, json),
            Commands::Mask(args) => cmd_mask(args, config_path, json),
            Commands::Unmask(args) => cmd_unmask(args, config_path, json),
            Commands::Config(args) => cmd_config(args, config_path, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The currency named on the command line, or the configured one
fn resolve_currency(
    flag: Option<&str>,
    config: &VeneerConfig,
) -> Result<&'static Currency, Box<dyn std::error::Error>> {
    let code = flag.unwrap_or(&config.currency.iso_code);
    Ok(Currency::lookup(code)?)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_simulate(
    args: SimulateArgs,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::load_config(config_path)?;
    let scenario = scenario_io::load_scenario(&args.path)?;
    let until_ms = args
        .until_ms
        .or(scenario.until_ms)
        .unwrap_or(scenario.last_step_ms() + simulate::DEFAULT_TAIL_MS);
    let trace = simulate::simulate_until(&config, &scenario, Some(until_ms));

    if json {
        let output = SimulationJson {
            scenario: args.path.display().to_string(),
            until_ms,
            effects: &trace,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for line in format_trace(&trace) {
            println!("{}", line);
        }
        println!("{}", format_trace_summary(&trace, until_ms));
    }
    Ok(())
}

fn cmd_mask(
    args: MaskArgs,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::load_config(config_path)?;
    let currency = resolve_currency(args.currency.as_deref(), &config)?;
    let masked = currency_mask::mask(&args.input, currency);

    if json {
        let output = MaskJson {
            input: &args.input,
            currency: currency.iso_code,
            masked,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", masked);
    }
    Ok(())
}

fn cmd_unmask(
    args: MaskArgs,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_io::load_config(config_path)?;
    let currency = resolve_currency(args.currency.as_deref(), &config)?;
    let amount = currency_mask::parse(&args.input, currency)?;

    if json {
        let output = UnmaskJson::new(&args.input, currency, amount);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", amount.minor());
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use crate::cli::commands::{ConfigAction, ConfigCmd};
use crate::io::config_io;

/// File the config subcommands operate on
fn target_path(explicit: Option<&Path>) -> PathBuf {
    config_io::config_path(explicit).unwrap_or_else(|| PathBuf::from(config_io::CONFIG_FILE))
}

pub fn cmd_config(
    args: ConfigCmd,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ConfigAction::Init { force } => {
            let path = target_path(config_path);
            config_io::init_config(&path, force)?;
            println!("wrote {}", path.display());
        }
        ConfigAction::Show => {
            let config = config_io::load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Set { key, value } => {
            let path = target_path(config_path);
            let mut doc = config_io::read_config_doc(&path)?;
            config_io::set_value(&mut doc, &key, &value)?;
            config_io::write_config(&path, &doc)?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::VeneerConfig;

/// File looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "veneer.toml";

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "VENEER_CONFIG";

const TEMPLATE: &str = include_str!("../templates/veneer.toml");

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not edit config: {0}")]
    Edit(#[from] toml_edit::TomlError),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolve which config file to use: the explicit path, then
/// `VENEER_CONFIG`, then `./veneer.toml` when it exists.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(CONFIG_FILE);
    local.is_file().then_some(local)
}

/// Load the effective config: file (if any), then environment overrides,
/// then validation.
pub fn load_config(explicit: Option<&Path>) -> Result<VeneerConfig, ConfigError> {
    let mut config = match config_path(explicit) {
        Some(path) => read_config(&path)?,
        None => {
            debug!("no config file, using defaults");
            VeneerConfig::default()
        }
    };
    apply_env_overrides(&mut config, |var| env::var(var).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Parse a config file without applying overrides
pub fn read_config(path: &Path) -> Result<VeneerConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), "loading config");
    toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reject configs the runtime cannot honor
pub fn validate(config: &VeneerConfig) -> Result<(), ConfigError> {
    let problems = config.problems();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(problems))
    }
}

/// Apply `VENEER_*` overrides. `lookup` returns the variable's value, if set.
pub fn apply_env_overrides(
    config: &mut VeneerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    fn parsed<T: std::str::FromStr>(
        var: &'static str,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Option<T>, ConfigError> {
        match lookup(var) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidEnv { var, value }),
        }
    }

    if let Some(ms) = parsed("VENEER_OVERLAY_DELAY_MS", &lookup)? {
        config.navigation.overlay_delay_ms = ms;
    }
    if let Some(ms) = parsed("VENEER_HIDE_DELAY_MS", &lookup)? {
        config.navigation.hide_delay_ms = ms;
    }
    if let Some(reduced) = parsed("VENEER_REDUCED_MOTION", &lookup)? {
        config.navigation.reduced_motion = reduced;
    }
    if let Some(seed) = parsed("VENEER_SEED", &lookup)? {
        config.navigation.seed = Some(seed);
    }
    Ok(())
}

/// Read the config file as a toml_edit document for formatting-preserving
/// edits. A missing file yields an empty document.
pub fn read_config_doc(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(text.parse()?)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    fs::write(path, doc.to_string())?;
    Ok(())
}

/// Set a dotted key (e.g. `navigation.overlay_delay_ms`) in the document.
///
/// The value is typed the way TOML would read it (bool, integer, float,
/// otherwise string), and the edited document must still describe a valid
/// config.
pub fn set_value(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    raw: &str,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }
    if !is_known_key(&parts) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let (field, tables) = parts
        .split_last()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let mut table = doc.as_table_mut();
    for (depth, name) in tables.iter().enumerate() {
        if !table.contains_key(name) {
            let mut new = toml_edit::Table::new();
            // Only the innermost table gets its own header
            new.set_implicit(depth + 1 < tables.len());
            table.insert(name, toml_edit::Item::Table(new));
        }
        table = table[*name]
            .as_table_mut()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{name}' is not a table"),
            })?;
    }
    table[*field] = toml_edit::value(typed_value(raw));

    let config: VeneerConfig =
        toml::from_str(&doc.to_string()).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.message().to_string(),
        })?;
    validate(&config)
}

fn is_known_key(parts: &[&str]) -> bool {
    const NAVIGATION: &[&str] = &[
        "tick_interval_ms",
        "max_tick_increment",
        "progress_cap",
        "overlay_delay_ms",
        "hide_delay_ms",
        "loading_message",
        "reduced_motion",
        "seed",
    ];
    match parts {
        ["navigation", field] => NAVIGATION.contains(field),
        ["optimistic", field] => matches!(*field, "error_marker_ms" | "failure_message"),
        ["toast", "duration_ms"] => true,
        ["currency", "iso_code"] => true,
        ["ui", "colors", _] => true,
        _ => false,
    }
}

fn typed_value(raw: &str) -> toml_edit::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return b.into();
    }
    if let Ok(i) = raw.parse::<i64>() {
        return i.into();
    }
    if let Ok(f) = raw.parse::<f64>()
        && f.is_finite()
    {
        return f.into();
    }
    raw.into()
}

/// Write the commented default config to `path`
pub fn init_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    fs::write(path, TEMPLATE)?;
    Ok(())
}

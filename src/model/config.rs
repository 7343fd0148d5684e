use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration from veneer.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeneerConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub optimistic: OptimisticConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl VeneerConfig {
    /// Human-readable descriptions of every invalid setting (empty when valid)
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let nav = &self.navigation;
        if nav.tick_interval_ms == 0 {
            problems.push("navigation.tick_interval_ms must be greater than 0".to_string());
        }
        if !(0.0..=100.0).contains(&nav.progress_cap) {
            problems.push("navigation.progress_cap must be between 0 and 100".to_string());
        }
        if nav.max_tick_increment.is_nan() || nav.max_tick_increment < 0.0 {
            problems.push("navigation.max_tick_increment must not be negative".to_string());
        }
        if crate::model::money::Currency::lookup(&self.currency.iso_code).is_err() {
            problems.push(format!(
                "currency.iso_code '{}' is not a supported currency",
                self.currency.iso_code
            ));
        }
        problems
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Period of the progress-bar tick
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Upper bound of the random amount added per tick
    #[serde(default = "default_max_tick_increment")]
    pub max_tick_increment: f64,
    /// Ticks never push the bar past this value
    #[serde(default = "default_progress_cap")]
    pub progress_cap: f64,
    /// Navigations shorter than this never show the overlay
    #[serde(default = "default_overlay_delay_ms")]
    pub overlay_delay_ms: u64,
    /// Time the bar stays at 100% before hiding on success
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
    /// Text announced through the live region while loading
    #[serde(default = "default_loading_message")]
    pub loading_message: String,
    /// Skip the completion animation and hide immediately
    #[serde(default)]
    pub reduced_motion: bool,
    /// Fixed seed for the tick jitter; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            tick_interval_ms: default_tick_interval_ms(),
            max_tick_increment: default_max_tick_increment(),
            progress_cap: default_progress_cap(),
            overlay_delay_ms: default_overlay_delay_ms(),
            hide_delay_ms: default_hide_delay_ms(),
            loading_message: default_loading_message(),
            reduced_motion: false,
            seed: None,
        }
    }
}

impl NavigationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn overlay_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_delay_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

/// Default: see src/templates/veneer.toml
fn default_tick_interval_ms() -> u64 {
    100
}

/// Default: see src/templates/veneer.toml
fn default_max_tick_increment() -> f64 {
    15.0
}

/// Default: see src/templates/veneer.toml
fn default_progress_cap() -> f64 {
    90.0
}

/// Default: see src/templates/veneer.toml
fn default_overlay_delay_ms() -> u64 {
    500
}

/// Default: see src/templates/veneer.toml
fn default_hide_delay_ms() -> u64 {
    200
}

fn default_loading_message() -> String {
    "Carregando…".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimisticConfig {
    /// How long the error marker stays on a reverted slot
    pub error_marker_ms: u64,
    /// Text announced through the live region when an edit is reverted
    pub failure_message: String,
}

impl Default for OptimisticConfig {
    fn default() -> Self {
        OptimisticConfig {
            error_marker_ms: 2000,
            failure_message: default_failure_message(),
        }
    }
}

fn default_failure_message() -> String {
    "Não foi possível salvar. O valor anterior foi restaurado.".to_string()
}

impl OptimisticConfig {
    pub fn error_marker(&self) -> Duration {
        Duration::from_millis(self.error_marker_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        ToastConfig { duration_ms: 4000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// ISO code used by the amount input mask
    pub iso_code: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            iso_code: "BRL".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Hex color overrides for the terminal host, keyed by theme slot
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{HostEvent, SlotId};

/// A scripted sequence of host events, read from TOML:
///
/// ```toml
/// seed = 7
///
/// [[slot]]
/// id = "account-name"
/// value = "Conta corrente"
///
/// [[step]]
/// at_ms = 0
/// event = "before-request"
/// request = 1
/// edit = { slot = "account-name", value = "Poupança" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Seed for the progress jitter; overrides the config
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default, rename = "slot")]
    pub slots: Vec<SlotDecl>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
    /// Stop time; defaults to 5s after the last step
    #[serde(default)]
    pub until_ms: Option<u64>,
}

/// A slot mounted before the first step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDecl {
    pub id: SlotId,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: HostEvent,
}

impl Scenario {
    /// Time of the last step (0 for an empty scenario)
    pub fn last_step_ms(&self) -> u64 {
        self.steps.last().map(|s| s.at_ms).unwrap_or(0)
    }
}

/// Error type for scenario files
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("step {index} at {at_ms}ms comes before the previous step")]
    OutOfOrder { index: usize, at_ms: u64 },
    #[error("slot '{0}' is declared twice")]
    DuplicateSlot(SlotId),
}

pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let text = fs::read_to_string(path).map_err(|e| ScenarioError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_scenario(&text)
}

/// Parse and check a scenario: steps in non-decreasing time, unique slots
pub fn parse_scenario(text: &str) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = toml::from_str(text)?;

    for (index, pair) in scenario.steps.windows(2).enumerate() {
        if pair[1].at_ms < pair[0].at_ms {
            return Err(ScenarioError::OutOfOrder {
                index: index + 1,
                at_ms: pair[1].at_ms,
            });
        }
    }

    let mut seen = HashSet::new();
    for decl in &scenario.slots {
        if !seen.insert(&decl.id) {
            return Err(ScenarioError::DuplicateSlot(decl.id.clone()));
        }
    }
    Ok(scenario)
}

use std::time::Duration;

use serde::Serialize;

use super::runtime::Runtime;
use crate::host::{Document, Effect};
use crate::io::scenario_io::Scenario;
use crate::model::VeneerConfig;

/// How long a scenario keeps running after its last step by default
pub const DEFAULT_TAIL_MS: u64 = 5000;

/// One surface effect and the virtual time it happened at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub effect: Effect,
}

pub type Trace = Vec<TraceEntry>;

/// Replay a scenario against an in-memory document.
///
/// Slots are mounted first. Before each step every timer due by the step's
/// time fires, so an event delivered at the same instant as a deadline sees
/// the timer's result. The jitter seed comes from the scenario, then the
/// config, then 0, so traces are reproducible.
pub fn simulate(config: &VeneerConfig, scenario: &Scenario) -> Trace {
    simulate_until(config, scenario, None)
}

/// As [`simulate`], with an explicit stop time overriding the scenario's
pub fn simulate_until(config: &VeneerConfig, scenario: &Scenario, until_ms: Option<u64>) -> Trace {
    let mut config = config.clone();
    config.navigation.seed = scenario.seed.or(config.navigation.seed).or(Some(0));

    let mut document = Document::new();
    let mounted: Vec<_> = scenario
        .slots
        .iter()
        .map(|decl| (decl.id.clone(), document.mount(decl.id.as_str(), decl.value.as_str())))
        .collect();
    let mut runtime = Runtime::new(config, document);
    for (slot, node) in mounted {
        runtime.mount_slot(slot, node);
    }

    let mut trace = Trace::new();
    for step in &scenario.steps {
        run_timers(&mut runtime, Duration::from_millis(step.at_ms), &mut trace);
        runtime.handle(&step.event);
        record(&mut runtime, &mut trace);
    }

    let until = until_ms
        .or(scenario.until_ms)
        .unwrap_or(scenario.last_step_ms() + DEFAULT_TAIL_MS);
    run_timers(&mut runtime, Duration::from_millis(until), &mut trace);
    trace
}

fn run_timers(runtime: &mut Runtime<Document>, until: Duration, trace: &mut Trace) {
    while runtime.fire_next(until).is_some() {
        record(runtime, trace);
    }
    runtime.advance_to(until);
}

fn record(runtime: &mut Runtime<Document>, trace: &mut Trace) {
    let at_ms = runtime.now().as_millis() as u64;
    trace.extend(
        runtime
            .surface_mut()
            .take_effects()
            .into_iter()
            .map(|effect| TraceEntry { at_ms, effect }),
    );
}

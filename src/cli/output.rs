use serde::Serialize;

use crate::model::{Amount, Currency};
use crate::ops::simulate::{Trace, TraceEntry};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SimulationJson<'a> {
    pub scenario: String,
    pub until_ms: u64,
    pub effects: &'a [TraceEntry],
}

#[derive(Serialize)]
pub struct MaskJson<'a> {
    pub input: &'a str,
    pub currency: &'a str,
    pub masked: String,
}

#[derive(Serialize)]
pub struct UnmaskJson<'a> {
    pub input: &'a str,
    pub currency: &'a str,
    pub minor_units: i64,
    pub amount: String,
}

impl<'a> UnmaskJson<'a> {
    pub fn new(input: &'a str, currency: &'a Currency, amount: Amount) -> Self {
        UnmaskJson {
            input,
            currency: currency.iso_code,
            minor_units: amount.minor(),
            amount: amount.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `   500ms  overlay shown`
pub fn format_trace_line(entry: &TraceEntry) -> String {
    format!("{:>6}ms  {}", entry.at_ms, entry.effect)
}

pub fn format_trace(trace: &Trace) -> Vec<String> {
    trace.iter().map(format_trace_line).collect()
}

/// Closing line of a text trace
pub fn format_trace_summary(trace: &Trace, until_ms: u64) -> String {
    let effects = trace.len();
    format!(
        "{} effect{} through {}ms",
        effects,
        if effects == 1 { "" } else { "s" },
        until_ms
    )
}

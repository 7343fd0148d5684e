use serde_json::Value;
use tracing::warn;

use crate::model::{ResponseHeaders, Toast, ToastKind};

pub const TRIGGER_HEADER: &str = "HX-Trigger";
pub const REDIRECT_HEADER: &str = "HX-Redirect";
pub const REFRESH_HEADER: &str = "HX-Refresh";

/// Event name the server uses to request a toast
pub const SHOW_TOAST: &str = "show-toast";

/// A client-side event requested by the server
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub name: String,
    /// Event detail; `Null` for bare event names
    pub detail: Value,
}

/// Full-page transition requested by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Redirect(String),
    Refresh,
}

/// Parse an `HX-Trigger` header value.
///
/// Accepts either a JSON object mapping event names to details, or a
/// comma-separated list of bare event names. Malformed JSON is logged and
/// yields no triggers.
pub fn parse_triggers(header: &str) -> Vec<Trigger> {
    let header = header.trim();
    if header.is_empty() {
        return Vec::new();
    }

    if header.starts_with('{') {
        return match serde_json::from_str::<serde_json::Map<String, Value>>(header) {
            Ok(map) => map
                .into_iter()
                .map(|(name, detail)| Trigger { name, detail })
                .collect(),
            Err(e) => {
                warn!(error = %e, "ignoring malformed {} header", TRIGGER_HEADER);
                Vec::new()
            }
        };
    }

    header
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Trigger {
            name: name.to_string(),
            detail: Value::Null,
        })
        .collect()
}

/// Build the toast a `show-toast` trigger asks for.
///
/// The detail is either `{"message": ..., "type": ...}` or a bare string.
pub fn toast_from_trigger(trigger: &Trigger) -> Option<Toast> {
    if trigger.name != SHOW_TOAST {
        return None;
    }
    match &trigger.detail {
        Value::String(message) if !message.is_empty() => Some(Toast {
            message: message.clone(),
            kind: ToastKind::Info,
        }),
        Value::Object(detail) => {
            let message = detail.get("message")?.as_str()?.to_string();
            let kind = detail
                .get("type")
                .and_then(Value::as_str)
                .map(ToastKind::from_type)
                .unwrap_or(ToastKind::Info);
            Some(Toast { message, kind })
        }
        _ => None,
    }
}

/// Every toast requested by a response's headers, in header order
pub fn toasts(headers: &ResponseHeaders) -> Vec<Toast> {
    headers
        .get(TRIGGER_HEADER)
        .map(parse_triggers)
        .unwrap_or_default()
        .iter()
        .filter_map(toast_from_trigger)
        .collect()
}

/// The full-page transition a response asks for, if any
pub fn navigation_directive(headers: &ResponseHeaders) -> Option<Directive> {
    if let Some(location) = headers.get(REDIRECT_HEADER).map(str::trim)
        && !location.is_empty()
    {
        return Some(Directive::Redirect(location.to_string()));
    }
    match headers.get(REFRESH_HEADER).map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("true") => Some(Directive::Refresh),
        _ => None,
    }
}

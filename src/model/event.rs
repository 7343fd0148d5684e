use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::slot::SlotId;

/// Identifier the host assigns to each request it dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Optimistic payload attached to an in-place edit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimisticEdit {
    pub slot: SlotId,
    /// Value to render immediately, before the server answers
    pub value: String,
}

/// Response headers as delivered by the request library.
///
/// Insertion order is preserved; lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseHeaders(IndexMap<String, String>);

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Events the host's request library and document deliver to the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostEvent {
    /// A request is about to be dispatched
    BeforeRequest {
        request: RequestId,
        /// Full-page replacement via an intercepted link or form
        #[serde(default)]
        boosted: bool,
        #[serde(default)]
        edit: Option<OptimisticEdit>,
        /// Success of this request resolves the whole enclosing transaction
        #[serde(default)]
        closes_transaction: bool,
    },
    /// A request finished, successfully or not
    AfterRequest {
        request: RequestId,
        successful: bool,
        #[serde(default)]
        headers: ResponseHeaders,
    },
    /// Non-2xx response or network error
    ResponseError { request: RequestId },
    /// The request library gave up waiting
    Timeout { request: RequestId },
    /// Back/forward navigation or a history push
    PushedIntoHistory {
        #[serde(default)]
        path: String,
    },
    /// The page is going away
    BeforeUnload,
}

impl HostEvent {
    /// Short kebab-case name used in traces and logs
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::BeforeRequest { .. } => "before-request",
            HostEvent::AfterRequest { .. } => "after-request",
            HostEvent::ResponseError { .. } => "response-error",
            HostEvent::Timeout { .. } => "timeout",
            HostEvent::PushedIntoHistory { .. } => "pushed-into-history",
            HostEvent::BeforeUnload => "before-unload",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let headers = ResponseHeaders::new().with("HX-Trigger", "saved");
        assert_eq!(headers.get("hx-trigger"), Some("saved"));
        assert_eq!(headers.get("HX-Redirect"), None);
    }

    #[test]
    fn deserialize_tagged_event() {
        let json = r#"{"event":"before-request","request":3,"boosted":true}"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            HostEvent::BeforeRequest {
                request: RequestId(3),
                boosted: true,
                edit: None,
                closes_transaction: false,
            }
        );
        assert_eq!(event.name(), "before-request");
    }

    #[test]
    fn deserialize_edit_payload() {
        let json = r#"{"event":"before-request","request":1,
            "edit":{"slot":"account-name","value":"Nubank"}}"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        let HostEvent::BeforeRequest { edit: Some(edit), boosted, .. } = event else {
            panic!("expected before-request with edit");
        };
        assert!(!boosted);
        assert_eq!(edit.slot.as_str(), "account-name");
        assert_eq!(edit.value, "Nubank");
    }
}

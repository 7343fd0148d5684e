use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::surface::Surface;
use crate::model::{SlotMarker, Toast, ToastId, ToastKind};

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// One element of the in-memory document
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Name used in effect logs (usually the slot name)
    pub label: String,
    pub value: String,
    pub marker: Option<SlotMarker>,
    pub attached: bool,
}

/// A single mutation applied to the document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "kebab-case")]
pub enum Effect {
    Bar { visible: bool },
    Progress { percent: f64 },
    Overlay { visible: bool },
    Skeleton { visible: bool },
    Announce { message: String },
    Value { slot: String, value: String },
    Marker { slot: String, marker: Option<SlotMarker> },
    ToastShown { id: ToastId, kind: ToastKind, message: String },
    ToastDismissed { id: ToastId },
}

fn on_off(visible: bool) -> &'static str {
    if visible { "shown" } else { "hidden" }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Bar { visible } => write!(f, "bar {}", on_off(*visible)),
            Effect::Progress { percent } => write!(f, "progress {:.1}", percent),
            Effect::Overlay { visible } => write!(f, "overlay {}", on_off(*visible)),
            Effect::Skeleton { visible } => write!(f, "skeleton {}", on_off(*visible)),
            Effect::Announce { message } if message.is_empty() => write!(f, "live-region cleared"),
            Effect::Announce { message } => write!(f, "live-region \"{}\"", message),
            Effect::Value { slot, value } => write!(f, "{} = \"{}\"", slot, value),
            Effect::Marker { slot, marker } => match marker {
                Some(m) => write!(f, "{} marked {}", slot, m.as_str()),
                None => write!(f, "{} unmarked", slot),
            },
            Effect::ToastShown { id, kind, message } => {
                write!(f, "{} {} \"{}\"", id, kind.as_str(), message)
            }
            Effect::ToastDismissed { id } => write!(f, "{} dismissed", id),
        }
    }
}

/// In-memory host document.
///
/// Holds the indicator state a browser page would keep in the DOM and logs
/// every effect it receives, so callers can assert on both end state and
/// the exact sequence of mutations.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    pub bar_visible: bool,
    pub progress: f64,
    pub overlay_visible: bool,
    pub skeleton_visible: bool,
    pub live_region: String,
    toasts: IndexMap<ToastId, Toast>,
    effects: Vec<Effect>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attached element rendering `value`
    pub fn mount(&mut self, label: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.nodes.push(Node {
            label: label.into(),
            value: value.into(),
            marker: None,
            attached: true,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Remove an element from the page; later reads and writes no-op
    pub fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.attached = false;
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.value.as_str())
    }

    pub fn marker(&self, id: NodeId) -> Option<SlotMarker> {
        self.node(id).and_then(|n| n.marker)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Toasts currently on screen, oldest first
    pub fn toasts(&self) -> impl Iterator<Item = (&ToastId, &Toast)> {
        self.toasts.iter()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Drain the effect log
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Number of logged effects matching `pred`
    pub fn count(&self, pred: impl Fn(&Effect) -> bool) -> usize {
        self.effects.iter().filter(|e| pred(e)).count()
    }

    fn attached_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).filter(|n| n.attached)
    }
}

impl Surface for Document {
    type Element = NodeId;

    fn show_bar(&mut self, visible: bool) {
        self.bar_visible = visible;
        self.effects.push(Effect::Bar { visible });
    }

    fn set_progress(&mut self, percent: f64) {
        self.progress = percent;
        self.effects.push(Effect::Progress { percent });
    }

    fn show_overlay(&mut self, visible: bool) {
        self.overlay_visible = visible;
        self.effects.push(Effect::Overlay { visible });
    }

    fn show_skeleton(&mut self, visible: bool) {
        self.skeleton_visible = visible;
        self.effects.push(Effect::Skeleton { visible });
    }

    fn announce(&mut self, message: &str) {
        self.live_region = message.to_string();
        self.effects.push(Effect::Announce {
            message: message.to_string(),
        });
    }

    fn read_value(&self, element: &NodeId) -> Option<String> {
        self.node(*element)
            .filter(|n| n.attached)
            .map(|n| n.value.clone())
    }

    fn write_value(&mut self, element: &NodeId, value: &str) -> bool {
        let Some(node) = self.attached_mut(*element) else {
            return false;
        };
        node.value = value.to_string();
        let slot = node.label.clone();
        self.effects.push(Effect::Value {
            slot,
            value: value.to_string(),
        });
        true
    }

    fn set_marker(&mut self, element: &NodeId, marker: Option<SlotMarker>) {
        let Some(node) = self.attached_mut(*element) else {
            return;
        };
        node.marker = marker;
        let slot = node.label.clone();
        self.effects.push(Effect::Marker { slot, marker });
    }

    fn show_toast(&mut self, id: ToastId, toast: &Toast) {
        self.toasts.insert(id, toast.clone());
        self.effects.push(Effect::ToastShown {
            id,
            kind: toast.kind,
            message: toast.message.clone(),
        });
    }

    fn dismiss_toast(&mut self, id: ToastId) {
        if self.toasts.shift_remove(&id).is_some() {
            self.effects.push(Effect::ToastDismissed { id });
        }
    }
}

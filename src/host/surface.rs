use crate::model::{SlotMarker, Toast, ToastId};

/// Outbound effects on the host document.
///
/// Implementations translate these into attribute/class mutations (a browser
/// document), widget state (the terminal host) or a recorded log (tests and
/// the simulator). Every method must be cheap and must not fail: the
/// indicator layer is best-effort and never blocks the request cycle.
pub trait Surface {
    /// Handle to a mounted element backing a slot
    type Element: Clone + std::fmt::Debug;

    /// Show or hide the thin top progress bar
    fn show_bar(&mut self, visible: bool);
    /// Set the bar fill, 0–100
    fn set_progress(&mut self, percent: f64);
    /// Show or hide the full-page loading overlay
    fn show_overlay(&mut self, visible: bool);
    /// Toggle skeleton placeholders in the content region
    fn show_skeleton(&mut self, visible: bool);
    /// Replace the ARIA-live region text (empty string clears it)
    fn announce(&mut self, message: &str);

    /// Current rendered value, or `None` if the element is detached
    fn read_value(&self, element: &Self::Element) -> Option<String>;
    /// Render a new value. Returns false if the element is detached.
    fn write_value(&mut self, element: &Self::Element, value: &str) -> bool;
    /// Apply or remove the tentative/error marker
    fn set_marker(&mut self, element: &Self::Element, marker: Option<SlotMarker>);

    fn show_toast(&mut self, id: ToastId, toast: &Toast);
    fn dismiss_toast(&mut self, id: ToastId);
}

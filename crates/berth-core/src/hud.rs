//! HUD status formatting and the notification sink contract.
//!
//! Pure output: the sink never feeds anything back into the core.

use crate::config::SnapConfig;

/// Receives short status strings from the core. Both methods default to
/// no-ops so hosts implement only what they display.
pub trait HudSink {
    /// Shows a short transient tip. `key` deduplicates repeats of the same
    /// tip kind.
    fn tip(&mut self, title: &str, body: &str, key: &str);

    /// Current build-mode control line, when the host exposes one.
    fn control_line(&self) -> Option<String> {
        None
    }

    /// Replaces the build-mode control line.
    fn set_control_line(&mut self, line: String) {
        let _ = line;
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHud;

impl HudSink for NullHud {
    fn tip(&mut self, _title: &str, _body: &str, _key: &str) {}
}

const GRID_SUFFIX_MARKER: &str = " | Grid:";

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// Formats a float with up to `max_decimals` places, trailing zeros trimmed.
fn format_trimmed(value: f32, max_decimals: usize) -> String {
    let mut s = format!("{value:.max_decimals$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Appends the current grid/rotation snap state to a build-mode control line.
///
/// Any previously appended state is stripped first, so re-applying to an
/// already-annotated line cannot stack suffixes.
pub fn control_tip_line(base: &str, config: &SnapConfig) -> String {
    let base = match base.find(GRID_SUFFIX_MARKER) {
        Some(index) => &base[..index],
        None => base,
    };
    format!(
        "{base} | Grid: [F7] {} ({}m) | RotSnap: [F9] {} ({}°)",
        on_off(config.grid_enabled),
        format_trimmed(config.grid_size, 2),
        on_off(config.rotation_enabled),
        format_trimmed(config.rotation_step_degrees, 0),
    )
}

/// Body text for the scale tip.
pub fn scale_tip(value: f32) -> String {
    format!("Scale: {}x", format_trimmed(value, 3))
}

/// Body text for the scale-reset tip.
pub fn scale_reset_tip(value: f32) -> String {
    format!("Scale reset to {}x", format_trimmed(value, 3))
}

/// Body text for the selection counter.
pub fn selection_tip(count: usize) -> String {
    format!("Selected: {count}")
}

pub fn selection_mode_tip(active: bool) -> String {
    format!("Selection mode {}", on_off(active))
}

pub const SELECTION_CLEARED_TIP: &str = "Selection cleared";
pub const NO_SELECTION_TIP: &str = "No objects selected";
pub const GROUP_PICKED_TIP: &str = "Group picked up. Move the aim point, then confirm or cancel.";
pub const GROUP_CANCELLED_TIP: &str = "Group move cancelled";
pub const GROUP_PLACED_TIP: &str = "Group placed";

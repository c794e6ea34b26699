//! Overlay window implementations.
//!
//! When the `overlay-gtk` feature is enabled, [`gtk::run_main_loop`] takes
//! over the main thread and drives both command processing and rendering
//! through the GLib main loop.

#[cfg(feature = "overlay-gtk")]
pub mod gtk;

use crate::build_order::OverlayContent;

/// Lines to display for `content`: one per note for a step, or the raw
/// text as a single block.
pub fn display_lines(content: &OverlayContent) -> Vec<String> {
    match content {
        OverlayContent::Step(step) => step.notes.clone(),
        OverlayContent::Raw(text) if text.is_empty() => Vec::new(),
        OverlayContent::Raw(text) => vec![text.clone()],
    }
}

/// CSS colour for an `[r, g, b]` triple.
pub fn css_rgb(rgb: [u8; 3]) -> String {
    format!("rgb({}, {}, {})", rgb[0], rgb[1], rgb[2])
}

//! Build-order text validation and parsing.
//!
//! A build order is stored as free text.  When the text is a JSON object
//! with a `build_order` array of steps, each step carrying a `notes` array
//! of display lines, the overlay walks through it step by step.  Any other
//! text is shown verbatim as a single freeform block.
//!
//! ```json
//! {
//!   "name": "Fast castle",
//!   "build_order": [
//!     { "notes": ["6 villagers on sheep", "build a house"] },
//!     { "notes": ["4 villagers on wood"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// A named, user-editable build order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOrder {
    /// Unique name within a [`BuildOrderStore`](crate::store::BuildOrderStore).
    pub name: String,
    /// Raw user text.  Usually JSON, but anything goes.
    #[serde(default)]
    pub text: String,
}

impl BuildOrder {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// One entry of a build order: the lines shown while the step is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub notes: Vec<String>,
}

/// What the overlay should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayContent {
    /// The active step of a well-formed build order.
    Step(Step),
    /// Text that is not a well-formed build order, shown as-is.
    Raw(String),
}

/// Wire shape of a well-formed build order.  Unknown keys (`name`,
/// `civilization`, per-step `time`, …) are ignored.
#[derive(Deserialize)]
struct BuildOrderDocument {
    build_order: Vec<Step>,
}

/// Parse `text` into its steps.
///
/// Returns `None` when the text is not JSON, lacks a `build_order` array,
/// contains a step without a `notes` string array, or has no steps at all.
pub fn parse_steps(text: &str) -> Option<Vec<Step>> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    // Serde would also accept a positional array for the document struct.
    if !value.is_object() {
        return None;
    }
    let doc: BuildOrderDocument = serde_json::from_value(value).ok()?;
    if doc.build_order.is_empty() {
        return None;
    }
    Some(doc.build_order)
}

/// Whether `text` is a well-formed build order.  Never fails.
pub fn validate(text: &str) -> bool {
    parse_steps(text).is_some()
}

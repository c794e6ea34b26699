//! Commands and actions shared by all components.
//!
//! [`Command`] is everything the [`OverlayController`](crate::controller::OverlayController)
//! can be asked to do, whether it comes from a hotkey, the control socket,
//! or a test.  [`Action`] is the subset that can be bound to a hotkey chord.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An overlay action that can be bound to a hotkey chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Toggle overlay visibility.
    ShowHide,
    /// Select the next build order, wrapping around.
    Cycle,
    /// Go to the previous step of the current build order.
    PreviousStep,
    /// Go to the next step of the current build order.
    NextStep,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::ShowHide,
        Action::Cycle,
        Action::PreviousStep,
        Action::NextStep,
    ];

    /// Parse an action name (case-insensitive; accepts "next-step",
    /// "NextStep", "next_step", "show/hide", …).
    pub fn parse(s: &str) -> Option<Action> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        match normalized.as_str() {
            "showhide" | "toggle" => Some(Action::ShowHide),
            "cycle" => Some(Action::Cycle),
            "previousstep" | "prevstep" | "previous" | "prev" => Some(Action::PreviousStep),
            "nextstep" | "next" => Some(Action::NextStep),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ShowHide => write!(f, "show-hide"),
            Action::Cycle => write!(f, "cycle"),
            Action::PreviousStep => write!(f, "previous-step"),
            Action::NextStep => write!(f, "next-step"),
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Action::parse(&s).ok_or_else(|| DeError::custom(format!("invalid action: {:?}", s)))
    }
}

/// Everything the controller can do.
///
/// On the wire (see [`ipc::listener`](crate::ipc::listener)) unit variants
/// are plain JSON strings (`"NextStep"`), the rest are single-key objects
/// (`{"Hotkey":"ctrl+alt+n"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Toggle overlay visibility.
    ShowHide,
    /// Select the next build order and show the overlay.
    Cycle,
    /// Go to the previous step (silent at the first step).
    PreviousStep,
    /// Go to the next step (silent at the last step).
    NextStep,

    /// A key chord was pressed.  Resolved through the hotkey binder; chords
    /// that are not bound are ignored.
    Hotkey(String),

    /// Select a build order by name.
    Select(String),
    /// Replace the text of the selected build order.
    SetText(String),
    /// Append a new empty build order and select it.
    Add,
    /// Remove the selected build order (never the last one).
    Remove,
    /// Rename the selected build order.
    Rename(String),

    /// Bind `chord` to `action`.  The chord `"Del"` clears the binding.
    BindHotkey { action: Action, chord: String },

    /// Overlay font size in points, clamped to `1..=49`.
    SetFontSize(u32),
}

impl Command {
    /// Whether the command edits settings that outlive the process
    /// (build orders, hotkeys or font size).
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Command::SetText(_)
                | Command::Add
                | Command::Remove
                | Command::Rename(_)
                | Command::BindHotkey { .. }
                | Command::SetFontSize(_)
        )
    }
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        match action {
            Action::ShowHide => Command::ShowHide,
            Action::Cycle => Command::Cycle,
            Action::PreviousStep => Command::PreviousStep,
            Action::NextStep => Command::NextStep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_display() {
        assert_eq!(Action::ShowHide.to_string(), "show-hide");
        assert_eq!(Action::Cycle.to_string(), "cycle");
        assert_eq!(Action::PreviousStep.to_string(), "previous-step");
        assert_eq!(Action::NextStep.to_string(), "next-step");
    }

    #[test]
    fn action_parse_is_lenient() {
        assert_eq!(Action::parse("NextStep"), Some(Action::NextStep));
        assert_eq!(Action::parse(" next_step "), Some(Action::NextStep));
        assert_eq!(Action::parse("previous-step"), Some(Action::PreviousStep));
        assert_eq!(Action::parse("Show/Hide"), Some(Action::ShowHide));
        assert_eq!(Action::parse("CYCLE"), Some(Action::Cycle));
        assert_eq!(Action::parse("jump"), None);
    }

    #[test]
    fn display_output_parses_back() {
        for action in Action::ALL {
            assert_eq!(Action::parse(&action.to_string()), Some(action));
        }
    }

    #[test]
    fn unit_commands_are_plain_strings() {
        let cmd: Command = serde_json::from_str(r#""NextStep""#).unwrap();
        assert_eq!(cmd, Command::NextStep);
        assert_eq!(serde_json::to_string(&Command::Cycle).unwrap(), r#""Cycle""#);
    }

    #[test]
    fn bind_hotkey_wire_format() {
        let cmd: Command =
            serde_json::from_str(r#"{"BindHotkey":{"action":"next-step","chord":"ctrl+n"}}"#)
                .unwrap();
        assert_eq!(
            cmd,
            Command::BindHotkey {
                action: Action::NextStep,
                chord: "ctrl+n".into()
            }
        );
    }

    #[test]
    fn bad_action_is_rejected() {
        let res = serde_json::from_str::<Command>(r#"{"BindHotkey":{"action":"fly","chord":"x"}}"#);
        assert!(res.is_err());
    }

    #[test]
    fn action_converts_to_command() {
        assert_eq!(Command::from(Action::PreviousStep), Command::PreviousStep);
        assert_eq!(Command::from(Action::ShowHide), Command::ShowHide);
    }

    #[test]
    fn only_edits_are_persisted() {
        assert!(Command::Add.is_edit());
        assert!(Command::SetFontSize(14).is_edit());
        assert!(Command::Rename("x".into()).is_edit());
        assert!(!Command::NextStep.is_edit());
        assert!(!Command::Select("x".into()).is_edit());
        assert!(!Command::Hotkey("ctrl+n".into()).is_edit());
    }
}

//! Key-chord parsing and the in-process hotkey registry.
//!
//! Chords are written the way most desktop tools write them:
//! `ctrl+alt+h`, `Shift+F1`, `Super+Page_Down`.  Parsing is
//! case-insensitive and normalises the modifier order, so `Alt+Ctrl+H` and
//! `ctrl+alt+h` are the same chord.
//!
//! The compositor (or any other global key grabber) forwards chord presses
//! as [`Command::Hotkey`](crate::command::Command::Hotkey); the
//! [`ChordRegistry`] turns them back into [`Action`]s.

use crate::command::Action;
use crate::traits::HotkeyBinder;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Modifier keys, in canonical order.
const MODIFIERS: [&str; 4] = ["ctrl", "alt", "shift", "super"];

/// A normalised key chord: zero or more modifiers plus exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    /// Indices into [`MODIFIERS`], sorted and deduplicated.
    modifiers: Vec<usize>,
    key: String,
}

/// Errors from parsing a chord string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChordError {
    #[error("empty chord")]
    Empty,
    #[error("chord {0:?} has no key besides modifiers")]
    NoKey(String),
    #[error("chord {0:?} has more than one key")]
    MultipleKeys(String),
    #[error("chord {0:?} repeats a modifier")]
    RepeatedModifier(String),
    #[error("chord {0:?} has an empty component")]
    EmptyComponent(String),
}

/// Result of interpreting user input for a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordInput {
    /// Nothing was entered.
    Empty,
    /// The deletion sentinel `Del`: clear the binding.
    Clear,
    Chord(Chord),
}

fn modifier_index(part: &str) -> Option<usize> {
    let canonical = match part {
        "ctrl" | "control" | "commandorcontrol" => "ctrl",
        "alt" | "option" | "altgr" => "alt",
        "shift" => "shift",
        "super" | "meta" | "win" | "logo" | "cmd" | "command" => "super",
        _ => return None,
    };
    MODIFIERS.iter().position(|m| *m == canonical)
}

impl Chord {
    pub fn parse(s: &str) -> Result<Chord, ChordError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ChordError::Empty);
        }
        let mut modifiers = Vec::new();
        let mut key: Option<String> = None;
        for raw in trimmed.split('+') {
            let part = raw.trim().to_lowercase();
            if part.is_empty() {
                return Err(ChordError::EmptyComponent(trimmed.to_string()));
            }
            if let Some(idx) = modifier_index(&part) {
                if modifiers.contains(&idx) {
                    return Err(ChordError::RepeatedModifier(trimmed.to_string()));
                }
                modifiers.push(idx);
            } else if key.is_some() {
                return Err(ChordError::MultipleKeys(trimmed.to_string()));
            } else {
                key = Some(part);
            }
        }
        let key = key.ok_or_else(|| ChordError::NoKey(trimmed.to_string()))?;
        modifiers.sort_unstable();
        Ok(Chord { modifiers, key })
    }

    /// The non-modifier key, lowercase.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &m in &self.modifiers {
            write!(f, "{}+", MODIFIERS[m])?;
        }
        write!(f, "{}", self.key)
    }
}

impl ChordInput {
    /// Interpret what the user typed into a hotkey field.
    pub fn parse(s: &str) -> Result<ChordInput, ChordError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(ChordInput::Empty);
        }
        if trimmed.eq_ignore_ascii_case("del") || trimmed.eq_ignore_ascii_case("delete") {
            return Ok(ChordInput::Clear);
        }
        Chord::parse(trimmed).map(ChordInput::Chord)
    }
}

//  Registry

/// Errors from the [`ChordRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("chord {chord} is already bound to {action}")]
    Conflict { chord: Chord, action: Action },
}

/// In-process [`HotkeyBinder`]: a map from chord to action.
///
/// Registering a chord that is already taken fails, mirroring what platform
/// hotkey APIs do with conflicting grabs.
#[derive(Debug, Default)]
pub struct ChordRegistry {
    bindings: HashMap<Chord, Action>,
}

impl ChordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl HotkeyBinder for ChordRegistry {
    type Error = RegistryError;

    fn register(&mut self, chord: &Chord, action: Action) -> Result<(), RegistryError> {
        if let Some(&existing) = self.bindings.get(chord) {
            return Err(RegistryError::Conflict {
                chord: chord.clone(),
                action: existing,
            });
        }
        debug!("register {} -> {}", chord, action);
        self.bindings.insert(chord.clone(), action);
        Ok(())
    }

    fn unregister(&mut self, chord: &Chord) {
        if self.bindings.remove(chord).is_some() {
            debug!("unregister {}", chord);
        }
    }

    fn resolve(&self, chord: &Chord) -> Option<Action> {
        self.bindings.get(chord).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(s: &str) -> Chord {
        Chord::parse(s).unwrap()
    }

    #[test]
    fn parse_normalises_case_and_order() {
        assert_eq!(chord("Alt+Ctrl+H"), chord("ctrl+alt+h"));
        assert_eq!(chord("Alt+Ctrl+H").to_string(), "ctrl+alt+h");
        assert_eq!(chord(" shift + F1 ").to_string(), "shift+f1");
    }

    #[test]
    fn parse_maps_modifier_aliases() {
        assert_eq!(chord("Control+Meta+x").to_string(), "ctrl+super+x");
        assert_eq!(chord("win+option+1").to_string(), "alt+super+1");
    }

    #[test]
    fn bare_key_is_a_chord() {
        let c = chord("F5");
        assert_eq!(c.key(), "f5");
        assert_eq!(c.to_string(), "f5");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Chord::parse(""), Err(ChordError::Empty));
        assert_eq!(Chord::parse("ctrl+alt"), Err(ChordError::NoKey("ctrl+alt".into())));
        assert_eq!(Chord::parse("a+b"), Err(ChordError::MultipleKeys("a+b".into())));
        assert_eq!(
            Chord::parse("ctrl+control+a"),
            Err(ChordError::RepeatedModifier("ctrl+control+a".into()))
        );
        assert_eq!(Chord::parse("ctrl++"), Err(ChordError::EmptyComponent("ctrl++".into())));
    }

    #[test]
    fn input_sentinels() {
        assert_eq!(ChordInput::parse("   "), Ok(ChordInput::Empty));
        assert_eq!(ChordInput::parse("Del"), Ok(ChordInput::Clear));
        assert_eq!(ChordInput::parse("delete"), Ok(ChordInput::Clear));
        assert_eq!(
            ChordInput::parse("ctrl+del"),
            Ok(ChordInput::Chord(chord("ctrl+del")))
        );
    }

    #[test]
    fn registry_resolves_registered_chords() {
        let mut reg = ChordRegistry::new();
        reg.register(&chord("ctrl+n"), Action::NextStep).unwrap();
        assert_eq!(reg.resolve(&chord("Ctrl+N")), Some(Action::NextStep));
        assert_eq!(reg.resolve(&chord("ctrl+p")), None);
    }

    #[test]
    fn registry_rejects_conflicts() {
        let mut reg = ChordRegistry::new();
        reg.register(&chord("ctrl+n"), Action::NextStep).unwrap();
        let err = reg.register(&chord("ctrl+n"), Action::Cycle).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Conflict {
                chord: chord("ctrl+n"),
                action: Action::NextStep
            }
        );
        assert_eq!(reg.resolve(&chord("ctrl+n")), Some(Action::NextStep));
    }

    #[test]
    fn unregister_frees_the_chord() {
        let mut reg = ChordRegistry::new();
        reg.register(&chord("ctrl+n"), Action::NextStep).unwrap();
        reg.unregister(&chord("ctrl+n"));
        assert!(reg.is_empty());
        reg.register(&chord("ctrl+n"), Action::Cycle).unwrap();
        assert_eq!(reg.len(), 1);
        // Unknown chords are ignored.
        reg.unregister(&chord("f9"));
    }
}

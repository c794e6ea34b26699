//! The orchestrator that ties the build-order store, the step sequencer,
//! the hotkey binder, and the overlay together.
//!
//! [`OverlayController`] owns all mutable state and is driven exclusively
//! from one thread: command sources on other threads only ever send
//! [`Command`]s over a channel.  Every state change that affects what is on
//! screen results in an [`OverlayEvent`] on the overlay channel, and every
//! successful edit is written back to the config file when one is attached.

use crate::build_order::{parse_steps, OverlayContent};
use crate::command::{Action, Command};
use crate::config::{clamp_font_size, Config, HotkeyConfig};
use crate::hotkey::{Chord, ChordInput};
use crate::sequencer::{SequencerState, StepSequencer};
use crate::store::{cycle, BuildOrderStore, StoreError};
use crate::traits::{HotkeyBinder, OverlayEvent};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;

/// Possible errors from the controller.  None of them is fatal; the
/// controller state stays consistent after every error.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The requested store edit was rejected.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The command needs a selected build order but there is none.
    #[error("no build order selected")]
    NoSelection,

    /// A hotkey could not be bound; the previous binding is kept.
    #[error("failed to bind {action} to {chord:?}: {reason}")]
    HotkeyBinding {
        action: Action,
        chord: String,
        reason: String,
    },
}

/// Owns the build orders, the selection, and the step position, and turns
/// [`Command`]s into [`OverlayEvent`]s.
///
/// Generic over any [`HotkeyBinder`] so tests (or another backend) can
/// inject their own.
///
/// # Typical usage
///
/// ```ignore
/// let mut controller = OverlayController::new(store, ChordRegistry::new());
/// controller.init_hotkeys(&config.hotkeys);
/// controller.set_overlay(tx);
/// controller.handle(Command::NextStep)?;
/// ```
pub struct OverlayController<H: HotkeyBinder> {
    store: BuildOrderStore,
    selected: Option<String>,
    sequencer: StepSequencer,
    binder: H,
    bound: HashMap<Action, Chord>,
    font_size: u32,
    overlay_tx: Option<mpsc::Sender<OverlayEvent>>,
    settings: Option<(PathBuf, Config)>,
}

impl<H: HotkeyBinder> OverlayController<H> {
    /// Create a controller with the first build order selected (if any).
    ///
    /// No hotkeys are bound and no overlay is attached yet.
    pub fn new(store: BuildOrderStore, binder: H) -> Self {
        let selected = store.get_index(0).map(|bo| bo.name.clone());
        Self {
            store,
            selected,
            sequencer: StepSequencer::new(),
            binder,
            bound: HashMap::new(),
            font_size: crate::config::OverlayConfig::default().font_size,
            overlay_tx: None,
            settings: None,
        }
    }

    /// Write settings back to `path` after every successful edit.
    ///
    /// `config` provides the sections the controller does not own (such as
    /// colours); build orders, font size and changed hotkeys are filled in
    /// from the controller on each save.
    pub fn persist_to(&mut self, path: PathBuf, config: Config) {
        self.settings = Some((path, config));
    }

    /// Register the configured chords.
    ///
    /// A chord that cannot be parsed or registered is logged and left
    /// unbound; the remaining ones are still registered.
    pub fn init_hotkeys(&mut self, hotkeys: &HotkeyConfig) {
        for action in Action::ALL {
            let raw = hotkeys.get(action);
            let chord = match ChordInput::parse(raw) {
                Ok(ChordInput::Chord(chord)) => chord,
                Ok(ChordInput::Empty) | Ok(ChordInput::Clear) => continue,
                Err(e) => {
                    warn!("failed to set {} hotkey {:?}: {}", action, raw, e);
                    continue;
                }
            };
            match self.binder.register(&chord, action) {
                Ok(()) => {
                    info!("{} hotkey: {}", action, chord);
                    self.bound.insert(action, chord);
                }
                Err(e) => warn!("failed to set {} hotkey {}: {}", action, chord, e),
            }
        }
    }

    /// Attach the overlay event channel and push the current content.
    pub fn set_overlay(&mut self, tx: mpsc::Sender<OverlayEvent>) {
        self.overlay_tx = Some(tx);
        self.send(OverlayEvent::SetFontSize(self.font_size));
        self.update_overlay();
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = clamp_font_size(size);
        self.send(OverlayEvent::SetFontSize(self.font_size));
    }

    pub fn store(&self) -> &BuildOrderStore {
        &self.store
    }

    pub fn binder(&self) -> &H {
        &self.binder
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    /// Name of the selected build order.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// The chords currently bound.
    pub fn hotkeys(&self) -> HotkeyConfig {
        let mut out = HotkeyConfig::default();
        for (action, chord) in &self.bound {
            out.set(*action, chord.to_string());
        }
        out
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<(), ControllerError> {
        let edit = cmd.is_edit();
        self.apply(cmd)?;
        if edit {
            self.save();
        }
        Ok(())
    }

    fn apply(&mut self, cmd: Command) -> Result<(), ControllerError> {
        match cmd {
            Command::ShowHide => {
                debug!("toggle overlay");
                self.send(OverlayEvent::ToggleVisibility);
            }

            Command::Cycle => {
                let names = self.store.names();
                let current = self.selected.clone().unwrap_or_default();
                if let Some(next) = cycle(&names, &current) {
                    info!("cycle to {:?}", next);
                    self.select(&next)?;
                }
                self.send(OverlayEvent::Show);
            }

            Command::PreviousStep => self.step(-1),
            Command::NextStep => self.step(1),

            Command::Hotkey(raw) => {
                let chord = match Chord::parse(&raw) {
                    Ok(chord) => chord,
                    Err(e) => {
                        debug!("ignoring hotkey {:?}: {}", raw, e);
                        return Ok(());
                    }
                };
                match self.binder.resolve(&chord) {
                    Some(action) => {
                        debug!("hotkey {} -> {}", chord, action);
                        return self.handle(action.into());
                    }
                    None => debug!("hotkey {} is not bound", chord),
                }
            }

            Command::Select(name) => self.select(&name)?,

            Command::SetText(text) => {
                let name = self.selected.clone().ok_or(ControllerError::NoSelection)?;
                self.store.set_text(&name, text)?;
                self.update_overlay();
            }

            Command::Add => {
                let name = self.store.add();
                info!("added {:?}", name);
                self.select(&name)?;
            }

            Command::Remove => {
                let name = self.selected.clone().ok_or(ControllerError::NoSelection)?;
                let idx = self.store.position(&name).unwrap_or(0);
                if !self.store.remove(&name) {
                    debug!("not removing {:?}: last build order", name);
                    return Ok(());
                }
                info!("removed {:?}", name);
                let next_idx = idx.min(self.store.len().saturating_sub(1));
                self.selected = self.store.get_index(next_idx).map(|bo| bo.name.clone());
                self.sequencer.reset();
                self.update_overlay();
            }

            Command::Rename(new_name) => {
                let old = self.selected.clone().ok_or(ControllerError::NoSelection)?;
                self.store.rename(&old, &new_name)?;
                info!("renamed {:?} to {:?}", old, new_name);
                self.selected = Some(new_name);
                self.update_overlay();
            }

            Command::BindHotkey { action, chord } => self.bind_hotkey(action, &chord)?,

            Command::SetFontSize(size) => self.set_font_size(size),
        }
        Ok(())
    }

    /// Bind `input` to `action`.
    ///
    /// `Del` clears the binding; empty input or the chord already bound is a
    /// no-op.  If the new chord cannot be registered the previous binding
    /// stays active.
    pub fn bind_hotkey(&mut self, action: Action, input: &str) -> Result<(), ControllerError> {
        let failure = |reason: String| ControllerError::HotkeyBinding {
            action,
            chord: input.to_string(),
            reason,
        };
        let chord = match ChordInput::parse(input).map_err(|e| failure(e.to_string()))? {
            ChordInput::Empty => return Ok(()),
            ChordInput::Clear => {
                if let Some(old) = self.bound.remove(&action) {
                    self.binder.unregister(&old);
                    info!("cleared {} hotkey (was {})", action, old);
                }
                self.remember_hotkey(action, String::new());
                return Ok(());
            }
            ChordInput::Chord(chord) => chord,
        };
        if self.bound.get(&action) == Some(&chord) {
            return Ok(());
        }
        self.binder
            .register(&chord, action)
            .map_err(|e| failure(e.to_string()))?;
        if let Some(old) = self.bound.insert(action, chord.clone()) {
            self.binder.unregister(&old);
        }
        info!("setting new {} hotkey to {}", action, chord);
        self.remember_hotkey(action, chord.to_string());
        Ok(())
    }

    /// Recompute the step range for the selected build order and send its
    /// content to the overlay.
    ///
    /// Text that is not a well-formed build order is sent verbatim; with
    /// nothing selected the overlay is cleared.
    pub fn update_overlay(&mut self) {
        let text = self
            .selected
            .as_deref()
            .and_then(|n| self.store.get(n))
            .map(|bo| bo.text.clone());
        let text = match text {
            Some(text) => text,
            None => {
                self.sequencer.reset();
                self.send(OverlayEvent::Clear);
                return;
            }
        };
        match parse_steps(&text) {
            Some(mut steps) => {
                self.sequencer
                    .set_step_count(i32::try_from(steps.len()).unwrap_or(i32::MAX));
                if let SequencerState::Active { current, .. } = self.sequencer.state() {
                    let step = steps.swap_remove(current);
                    self.send(OverlayEvent::Render(OverlayContent::Step(step)));
                }
            }
            None => {
                self.sequencer.reset();
                self.send(OverlayEvent::Render(OverlayContent::Raw(text)));
            }
        }
    }

    //  internals

    /// Switch to `name`, starting again from its first step.
    fn select(&mut self, name: &str) -> Result<(), ControllerError> {
        if self.store.get(name).is_none() {
            return Err(StoreError::Unknown(name.to_string()).into());
        }
        if self.selected.as_deref() == Some(name) {
            return Ok(());
        }
        debug!("select {:?}", name);
        self.selected = Some(name.to_string());
        self.sequencer.reset();
        self.update_overlay();
        Ok(())
    }

    fn step(&mut self, delta: i32) {
        if self.sequencer.advance(delta) {
            debug!("step {}", self.sequencer.current_step());
            self.update_overlay();
        }
    }

    fn remember_hotkey(&mut self, action: Action, chord: String) {
        if let Some((_, config)) = &mut self.settings {
            config.hotkeys.set(action, chord);
        }
    }

    fn save(&mut self) {
        let Some((path, config)) = &mut self.settings else {
            return;
        };
        config.build_orders = self.store.entries().to_vec();
        config.overlay.font_size = self.font_size;
        match config.save(path) {
            Ok(()) => debug!("settings saved to {}", path.display()),
            Err(e) => warn!("failed to save settings: {}", e),
        }
    }

    fn send(&self, event: OverlayEvent) {
        if let Some(tx) = &self.overlay_tx {
            let _ = tx.send(event);
        }
    }
}

//  Tests

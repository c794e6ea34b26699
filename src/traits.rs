//! Core traits that decouple the overlay logic from any specific hotkey
//! backend, transport, or toolkit.
//!
//! The [`OverlayController`](crate::controller::OverlayController) only
//! depends on these abstractions plus an [`mpsc`] sender for
//! [`OverlayEvent`]s.

use crate::build_order::OverlayContent;
use crate::command::{Action, Command};
use crate::hotkey::Chord;
use std::sync::mpsc;

/// A process-wide hotkey service.
///
/// An implementation might grab keys through a desktop portal, through the
/// compositor, or keep a plain in-memory table such as
/// [`ChordRegistry`](crate::hotkey::ChordRegistry).  The controller holds
/// one injected instance; nothing registers hotkeys behind its back.
pub trait HotkeyBinder {
    /// The error type produced when a chord cannot be registered.
    type Error: std::error::Error + Send + 'static;

    /// Bind `chord` to `action`.
    ///
    /// Fails if the chord cannot be grabbed, e.g. because it is already in
    /// use.  On failure the binder state is unchanged.
    fn register(&mut self, chord: &Chord, action: Action) -> Result<(), Self::Error>;

    /// Release `chord`.  Unknown chords are ignored.
    fn unregister(&mut self, chord: &Chord);

    /// The action bound to `chord`, if any.
    fn resolve(&self, chord: &Chord) -> Option<Action>;
}

/// Events sent from the controller to the overlay window.
///
/// The overlay owns its own visibility flag; the controller only says
/// *what* to show and when visibility should change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Replace the displayed content entirely.
    Render(OverlayContent),
    /// Nothing is selected: show an empty overlay.
    Clear,
    /// Flip between shown and hidden.
    ToggleVisibility,
    /// Make the overlay visible (no-op when already shown).
    Show,
    /// Change the note font size, in points.
    SetFontSize(u32),
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, a hotkey
/// portal, an in-memory channel, …) and forward parsed commands into the
/// provided [`mpsc::Sender`].  This is how events raised on other threads
/// reach the single thread that owns the controller.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}

//! **bo-overlay**: an always-on-top build order overlay for real-time
//! strategy games.
//!
//! A build order is a named piece of text.  When the text is a JSON document
//! with a `build_order` list of steps, the overlay shows one step at a time
//! and hotkeys move between steps; any other text is shown verbatim.
//!
//! # Architecture
//!
//! [`controller::OverlayController`] owns all state and runs on a single
//! thread.  It is decoupled from its surroundings by two traits:
//!
//! * [`traits::HotkeyBinder`]: the injected hotkey service that maps key
//!   chords to [`command::Action`]s.
//! * [`traits::CommandSource`]: the transport that delivers user intent
//!   (a Unix socket, a test harness, …) from other threads.
//!
//! The controller reports what to display as [`traits::OverlayEvent`]s; the
//! GTK window in [`overlay`] renders them.

pub mod build_order;
pub mod command;
pub mod config;
pub mod controller;
pub mod hotkey;
pub mod ipc;
pub mod overlay;
pub mod sequencer;
pub mod store;
pub mod traits;

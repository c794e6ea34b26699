//! Entry point for the **bo-overlay** daemon.
//!
//! Spawns all configured [`CommandSource`](bo_overlay::traits::CommandSource)s
//! on background threads and processes incoming commands on the main thread.
//!
//! When the `overlay-gtk` feature is enabled the main thread runs the GLib
//! main loop (GTK4 requires it) and polls the command channel from there.
//! Without the feature, a blocking loop logs what the overlay would show.

use bo_overlay::command::Command;
use bo_overlay::config::Config;
use bo_overlay::controller::OverlayController;
use bo_overlay::hotkey::ChordRegistry;
use bo_overlay::ipc::default_socket_path;
use bo_overlay::ipc::listener::UnixSocketListener;
use bo_overlay::store::BuildOrderStore;
use bo_overlay::traits::{CommandSource, HotkeyBinder};
use log::{error, info};
use std::sync::mpsc;

/// Resolve the config directory (`$XDG_CONFIG_HOME/bo-overlay`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("bo-overlay")
}

/// `$XDG_CONFIG_HOME/bo-overlay/config.json`.
fn config_path() -> std::path::PathBuf {
    config_dir().join("config.json")
}

/// Try to load the config file, falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_path();
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// Resolve the CSS stylesheet path.
#[cfg(feature = "overlay-gtk")]
fn css_path() -> std::path::PathBuf {
    config_dir().join("style.css")
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();

    let mut store = BuildOrderStore::from_entries(config.build_orders.iter().cloned());
    if store.is_empty() {
        store.add();
    }
    info!("{} build order(s)", store.len());

    let mut controller = OverlayController::new(store, ChordRegistry::new());
    controller.init_hotkeys(&config.hotkeys);
    controller.set_font_size(config.overlay.font_size);
    controller.persist_to(config_path(), config.clone());

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    start_event_loop(controller, cmd_rx, config);
}

//  Event loops

#[cfg(feature = "overlay-gtk")]
fn start_event_loop<H: HotkeyBinder + 'static>(
    controller: OverlayController<H>,
    cmd_rx: mpsc::Receiver<Command>,
    config: Config,
) {
    bo_overlay::overlay::gtk::run_main_loop(controller, cmd_rx, Some(css_path()), config.overlay);
}

#[cfg(not(feature = "overlay-gtk"))]
fn start_event_loop<H: HotkeyBinder>(
    mut controller: OverlayController<H>,
    cmd_rx: mpsc::Receiver<Command>,
    _config: Config,
) {
    use bo_overlay::overlay::display_lines;
    use bo_overlay::traits::OverlayEvent;

    let (overlay_tx, overlay_rx) = mpsc::channel::<OverlayEvent>();
    controller.set_overlay(overlay_tx);

    info!("bo-overlay running without a window");
    let log_events = |rx: &mpsc::Receiver<OverlayEvent>| {
        for event in rx.try_iter() {
            match event {
                OverlayEvent::Render(content) => {
                    for line in display_lines(&content) {
                        info!("| {}", line);
                    }
                }
                other => info!("overlay: {:?}", other),
            }
        }
    };
    log_events(&overlay_rx);
    for cmd in cmd_rx {
        if let Err(e) = controller.handle(cmd) {
            error!("command error: {}", e);
        }
        log_events(&overlay_rx);
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    {
        let tx = tx.clone();
        let path = default_socket_path();
        std::thread::spawn(move || {
            let mut source = UnixSocketListener::new(&path);
            if let Err(e) = source.run(tx) {
                error!("socket listener error: {}", e);
            }
        });
    }

    // Global key presses reach the daemon through the same socket as
    // `Hotkey` commands (see `bo-overlay-ctl hotkey`), so no separate
    // keyboard thread is needed.

    drop(tx);
}

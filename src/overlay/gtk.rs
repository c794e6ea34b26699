//! GTK4 + layer-shell overlay that runs on the **main thread**.
//!
//! The window lives on the layer-shell `Overlay` layer, never takes keyboard
//! focus, and has an empty input region, so clicks go straight through to
//! the game underneath.
//!
//! # Widget tree
//!
//! ```text
//! window                 (layer-shell, transparent, click-through)
//! └ .bo-overlay          (rounded box, background colour + opacity)
//!     ├ .bo-note         (one label per note of the current step)
//!     └ …
//! ```
//!
//! Freeform text is shown as a single `.bo-note.bo-raw` label.
//!
//! # CSS selectors
//!
//! | Selector       | Targets                                  |
//! |----------------|------------------------------------------|
//! | `window`       | The overlay window (keep transparent)    |
//! | `.bo-overlay`  | Container around the notes               |
//! | `.bo-note`     | Every note line                          |
//! | `.bo-raw`      | The label used for freeform text         |
//!
//! Colours and font size come from [`OverlayConfig`]; a user stylesheet is
//! loaded on top of them.

use super::{css_rgb, display_lines};
use crate::build_order::OverlayContent;
use crate::command::Command;
use crate::config::OverlayConfig;
use crate::controller::OverlayController;
use crate::traits::{HotkeyBinder, OverlayEvent};
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
use gtk4_layer_shell::{Edge, LayerShell};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

//  Default CSS

const BASE_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}

.bo-overlay {
    border-radius: 8px;
    padding: 15px;
}

.bo-note {
    font-family: Arial, sans-serif;
    margin-bottom: 10px;
}
"#;

/// CSS derived from the config: colours and font size.
fn config_css(config: &OverlayConfig, font_size: u32) -> String {
    format!(
        ".bo-overlay {{ background-color: {}; }}\n\
         .bo-note {{ color: {}; font-size: {}pt; }}\n",
        css_rgb(config.background_color),
        css_rgb(config.text_color),
        font_size,
    )
}

//  Visibility

/// Shown / hidden toggle driven by [`OverlayEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Hidden,
    Visible,
}

//  Notes view

struct NotesView {
    container: gtk4::Box,
    style: gtk4::CssProvider,
    config: OverlayConfig,
}

impl NotesView {
    fn new(window: &gtk4::Window, config: &OverlayConfig) -> Self {
        let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
        container.add_css_class("bo-overlay");
        container.set_can_target(false);
        window.set_child(Some(&container));

        let style = gtk4::CssProvider::new();
        if let Some(display) = gdk::Display::default() {
            gtk4::style_context_add_provider_for_display(
                &display,
                &style,
                gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }

        let view = Self {
            container,
            style,
            config: config.clone(),
        };
        view.set_font_size(config.font_size);
        view
    }

    /// Replace everything currently shown.
    fn render(&self, content: &OverlayContent) {
        while let Some(child) = self.container.first_child() {
            self.container.remove(&child);
        }
        for line in display_lines(content) {
            let label = gtk4::Label::new(Some(line.as_str()));
            label.add_css_class("bo-note");
            if matches!(content, OverlayContent::Raw(_)) {
                label.add_css_class("bo-raw");
                label.set_wrap(true);
            }
            label.set_xalign(0.0);
            self.container.append(&label);
        }
    }

    fn clear(&self) {
        self.render(&OverlayContent::Raw(String::new()));
    }

    fn set_font_size(&self, size: u32) {
        #[allow(deprecated)]
        self.style.load_from_data(&config_css(&self.config, size));
    }
}

//  Public API

/// Run the GTK4 main loop on the **current** (main) thread.
///
/// Commands from `cmd_rx` are applied to `controller` on this thread; the
/// resulting [`OverlayEvent`]s update the window.  Returns when every
/// command source has gone away.
pub fn run_main_loop<H: HotkeyBinder + 'static>(
    mut controller: OverlayController<H>,
    cmd_rx: mpsc::Receiver<Command>,
    css_path: Option<PathBuf>,
    config: OverlayConfig,
) {
    if let Err(e) = gtk4::init() {
        error!("failed to initialise GTK4: {}", e);
        return;
    }
    info!("GTK4 initialised on main thread");

    //  Layer-shell overlay window
    let window = gtk4::Window::new();
    window.init_layer_shell();
    window.set_layer(gtk4_layer_shell::Layer::Overlay);
    window.set_namespace("bo-overlay");
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::None);
    window.set_anchor(Edge::Top, true);
    window.set_anchor(Edge::Left, true);
    window.set_margin(Edge::Top, config.margin_top);
    window.set_margin(Edge::Left, config.margin_left);
    window.set_decorated(false);
    window.set_opacity(config.opacity.clamp(0.0, 1.0));
    window.remove_css_class("background");

    // An empty input region makes the surface transparent to the pointer.
    window.connect_realize(|w| match w.surface() {
        Some(surface) => surface.set_input_region(&cairo::Region::create()),
        None => warn!("overlay has no surface; it will not be click-through"),
    });

    let notes = NotesView::new(&window, &config);
    load_css(&css_path);

    //  Overlay channel
    let (overlay_tx, overlay_rx) = mpsc::channel::<OverlayEvent>();
    controller.set_overlay(overlay_tx);

    window.present();
    let mut visibility = Visibility::Visible;

    info!(
        "overlay ready (font {}pt, opacity {:.2}, CSS: {})",
        config.font_size,
        config.opacity,
        css_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in>".into()),
    );

    //  Main event loop (~60 fps)
    glib::timeout_add_local(Duration::from_millis(16), move || {
        // 1. Drain commands.
        let mut disconnected = false;
        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => {
                    debug!("command: {:?}", cmd);
                    if let Err(e) = controller.handle(cmd) {
                        error!("command error: {}", e);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        // 2. Drain overlay events.
        while let Ok(event) = overlay_rx.try_recv() {
            match event {
                OverlayEvent::Render(content) => {
                    notes.render(&content);
                    // Shrink back to the content after a longer step.
                    window.set_default_size(1, 1);
                }
                OverlayEvent::Clear => notes.clear(),
                OverlayEvent::SetFontSize(size) => notes.set_font_size(size),
                OverlayEvent::Show => {
                    window.set_visible(true);
                    visibility = Visibility::Visible;
                }
                OverlayEvent::ToggleVisibility => {
                    visibility = match visibility {
                        Visibility::Visible => Visibility::Hidden,
                        Visibility::Hidden => Visibility::Visible,
                    };
                    window.set_visible(visibility == Visibility::Visible);
                    debug!("overlay {:?}", visibility);
                }
            }
        }

        if disconnected {
            info!("all sources closed, exiting");
            return glib::ControlFlow::Break;
        }
        glib::ControlFlow::Continue
    });

    info!("entering GLib main loop");
    let main_loop = glib::MainLoop::new(None, false);
    main_loop.run();
    info!("GLib main loop exited");
}

//  CSS loading

fn load_css(css_path: &Option<PathBuf>) {
    let provider = gtk4::CssProvider::new();

    let css_content = match css_path.as_ref().filter(|p| p.exists()) {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(content) => {
                info!("user CSS: {} ({} bytes)", p.display(), content.len());
                format!("{}\n{}", BASE_CSS, content)
            }
            Err(e) => {
                warn!("CSS read failed ({}): {}, using built-in", p.display(), e);
                BASE_CSS.to_string()
            }
        },
        None => {
            info!("no user CSS, using built-in default");
            BASE_CSS.to_string()
        }
    };

    #[allow(deprecated)]
    provider.load_from_data(&css_content);

    if let Some(display) = gdk::Display::default() {
        // Above the config-derived provider so user rules win.
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_USER,
        );
        info!("CSS registered on display");
    } else {
        warn!("no GDK display, CSS will not be applied");
    }
}

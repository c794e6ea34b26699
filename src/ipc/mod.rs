//! IPC listener that accepts commands over a Unix socket.
//!
//! Compositor key binds, scripts, and `bo-overlay-ctl` connect to the
//! socket and send newline-delimited JSON commands.

pub mod client;
pub mod listener;

/// Socket path shared by the daemon and `bo-overlay-ctl`:
/// `$XDG_RUNTIME_DIR/bo-overlay.sock`, or `/tmp` when unset.
pub fn default_socket_path() -> std::path::PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    std::path::PathBuf::from(runtime).join("bo-overlay.sock")
}

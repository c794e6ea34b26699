//! `bo-overlay-ctl`: send one command to a running bo-overlay daemon.
//!
//! Meant for compositor key binds, e.g. on Hyprland:
//!
//! ```text
//! bind = CTRL ALT, right, exec, bo-overlay-ctl hotkey ctrl+alt+right
//! bind = CTRL ALT, h, exec, bo-overlay-ctl show-hide
//! ```

use bo_overlay::ipc::client::{command_from_args, send_command};
use bo_overlay::ipc::default_socket_path;
use log::error;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = match command_from_args(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            error!("{}", e);
            eprintln!("usage: bo-overlay-ctl <show-hide|cycle|prev|next|add|remove|hotkey|select|rename|set-text|bind|font-size> [args]");
            std::process::exit(2);
        }
    };

    let path = default_socket_path();
    if let Err(e) = send_command(&path, &cmd) {
        error!("failed to reach {}: {}", path.display(), e);
        std::process::exit(1);
    }
}

//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and serves every connection on its own
//! thread, so a client that never closes cannot hold up the others.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! "NextStep"
//! "ShowHide"
//! {"Hotkey":"ctrl+alt+right"}
//! {"Select":"Fast castle"}
//! {"SetText":"{\"build_order\":[{\"notes\":[\"6 on sheep\"]}]}"}
//! {"BindHotkey":{"action":"cycle","chord":"ctrl+alt+c"}}
//! ```
//!
//! A compositor bind such as
//! `bind = CTRL ALT, right, exec, bo-overlay-ctl hotkey ctrl+alt+right`
//! turns a global key press into a `Hotkey` command.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands and is read on a dedicated thread until it closes.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// Returns on the first connection accepted after the command sink has
    /// closed.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        let closed = Arc::new(AtomicBool::new(false));
        for stream in listener.incoming() {
            if closed.load(Ordering::SeqCst) {
                break;
            }
            match stream {
                Ok(stream) => {
                    let sink = sink.clone();
                    let closed = Arc::clone(&closed);
                    std::thread::spawn(move || {
                        if !serve_client(stream, &sink) {
                            closed.store(true, Ordering::SeqCst);
                        }
                    });
                }
                Err(e) => error!("accept error: {}", e),
            }
        }

        info!("sink closed, shutting down");
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

/// Forward every command sent over `stream` to `sink`.
///
/// Returns `false` once the sink has gone away.
fn serve_client(stream: UnixStream, sink: &mpsc::Sender<Command>) -> bool {
    debug!("client connected");
    for line in BufReader::new(stream).lines() {
        let text = match line {
            Ok(text) => text,
            Err(e) => {
                error!("read error: {}", e);
                break;
            }
        };
        if text.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Command>(&text) {
            Ok(cmd) => {
                debug!("received {:?}", cmd);
                if sink.send(cmd).is_err() {
                    return false;
                }
            }
            Err(e) => error!("bad command: {} ({})", text, e),
        }
    }
    debug!("client disconnected");
    true
}

//  Tests

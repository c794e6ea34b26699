//! Client side of the control socket, used by `bo-overlay-ctl`.

use crate::command::{Action, Command};
use crate::ipc::listener::UnixSocketError;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;

/// Errors from turning command-line arguments into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid {what}: {value:?}")]
    Invalid { what: &'static str, value: String },
}

/// Build a [`Command`] from `bo-overlay-ctl` arguments (program name
/// excluded).
///
/// ```text
/// show-hide | cycle | prev | next | add | remove
/// hotkey <chord>         select <name>       rename <name>
/// bind <action> <chord>  font-size <points>  set-text <text>
/// ```
///
/// Multi-word names and texts may be passed unquoted; the remaining
/// arguments are joined with spaces.
pub fn command_from_args(args: &[String]) -> Result<Command, ArgsError> {
    let (name, rest) = args.split_first().ok_or(ArgsError::MissingCommand)?;
    let joined = |what: &'static str| -> Result<String, ArgsError> {
        if rest.is_empty() {
            Err(ArgsError::MissingArgument(what))
        } else {
            Ok(rest.join(" "))
        }
    };
    let cmd = match name.as_str() {
        "show-hide" | "toggle" => Command::ShowHide,
        "cycle" => Command::Cycle,
        "prev" | "previous" | "previous-step" => Command::PreviousStep,
        "next" | "next-step" => Command::NextStep,
        "add" => Command::Add,
        "remove" => Command::Remove,
        "hotkey" => Command::Hotkey(joined("hotkey")?),
        "select" => Command::Select(joined("select")?),
        "rename" => Command::Rename(joined("rename")?),
        "set-text" => Command::SetText(joined("set-text")?),
        "font-size" => {
            let value = joined("font-size")?;
            let size = value.trim().parse().map_err(|_| ArgsError::Invalid {
                what: "font size",
                value: value.clone(),
            })?;
            Command::SetFontSize(size)
        }
        "bind" => {
            let (action, chord) = rest
                .split_first()
                .ok_or(ArgsError::MissingArgument("bind"))?;
            let action = Action::parse(action).ok_or_else(|| ArgsError::Invalid {
                what: "action",
                value: action.clone(),
            })?;
            if chord.is_empty() {
                return Err(ArgsError::MissingArgument("bind"));
            }
            Command::BindHotkey {
                action,
                chord: chord.join(" "),
            }
        }
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };
    Ok(cmd)
}

/// Send one command to the daemon listening on `path`.
pub fn send_command(path: &Path, cmd: &Command) -> Result<(), UnixSocketError> {
    let line = serde_json::to_string(cmd)?;
    let mut stream = UnixStream::connect(path)?;
    writeln!(stream, "{}", line)?;
    stream.shutdown(std::net::Shutdown::Write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::listener::UnixSocketListener;
    use crate::traits::CommandSource;
    use std::sync::mpsc;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn simple_commands() {
        assert_eq!(command_from_args(&args(&["next"])), Ok(Command::NextStep));
        assert_eq!(command_from_args(&args(&["prev"])), Ok(Command::PreviousStep));
        assert_eq!(command_from_args(&args(&["toggle"])), Ok(Command::ShowHide));
        assert_eq!(command_from_args(&args(&["cycle"])), Ok(Command::Cycle));
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(
            command_from_args(&args(&["select", "Fast", "castle"])),
            Ok(Command::Select("Fast castle".into()))
        );
        assert_eq!(
            command_from_args(&args(&["hotkey", "ctrl+alt+h"])),
            Ok(Command::Hotkey("ctrl+alt+h".into()))
        );
        assert_eq!(
            command_from_args(&args(&["bind", "next-step", "ctrl+n"])),
            Ok(Command::BindHotkey {
                action: Action::NextStep,
                chord: "ctrl+n".into()
            })
        );
        assert_eq!(
            command_from_args(&args(&["font-size", "16"])),
            Ok(Command::SetFontSize(16))
        );
    }

    #[test]
    fn argument_errors() {
        assert_eq!(command_from_args(&[]), Err(ArgsError::MissingCommand));
        assert_eq!(
            command_from_args(&args(&["fly"])),
            Err(ArgsError::UnknownCommand("fly".into()))
        );
        assert_eq!(
            command_from_args(&args(&["select"])),
            Err(ArgsError::MissingArgument("select"))
        );
        assert_eq!(
            command_from_args(&args(&["bind", "next"])),
            Err(ArgsError::MissingArgument("bind"))
        );
        assert!(matches!(
            command_from_args(&args(&["bind", "jump", "f1"])),
            Err(ArgsError::Invalid { what: "action", .. })
        ));
        assert!(matches!(
            command_from_args(&args(&["font-size", "big"])),
            Err(ArgsError::Invalid { what: "font size", .. })
        ));
    }

    #[test]
    fn send_reaches_listener() {
        let path = std::env::temp_dir().join(format!("bo-overlay-client-{}.sock", std::process::id()));
        let (tx, rx) = mpsc::channel();
        let listen_path = path.clone();
        std::thread::spawn(move || {
            let _ = UnixSocketListener::new(&listen_path).run(tx);
        });
        std::thread::sleep(std::time::Duration::from_millis(150));

        send_command(&path, &Command::Select("Fast castle".into())).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(cmds, vec![Command::Select("Fast castle".into())]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn send_without_daemon_fails() {
        let path = std::env::temp_dir().join(format!("bo-overlay-nobody-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        assert!(send_command(&path, &Command::NextStep).is_err());
    }
}

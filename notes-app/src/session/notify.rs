//! Terminal-level effects for delivered admin commands.
//!
//! The GUI renders these as overlays and modal dialogs; the headless client
//! renders them with terminal escape codes (BEL, OSC 9, OSC 777) and plays
//! sounds through detached system players.

use crate::session::dispatcher::CommandHandler;
use crate::session::protocol::AdminCommand;
use std::io::{self, Write};
use std::process::Command;
use tokio::sync::watch;

/// Emits desktop-notification escape codes to stdout.
///
/// Writes multiple sequences to cover common terminal emulators:
/// - BEL (`\x07`) - universal terminal bell
/// - OSC 9 (iTerm2) - desktop notification
/// - OSC 777 (Konsole/VTE/Gnome Terminal) - desktop notification
pub fn emit_terminal_notification(title: &str, message: &str) {
    let mut stdout = io::stdout();

    let _ = stdout.write_all(b"\x07");

    let osc9 = format!("\x1b]9;{}\x07", escape_osc(message));
    let _ = stdout.write_all(osc9.as_bytes());

    let osc777 = format!(
        "\x1b]777;notify;{};{}\x07",
        escape_osc(title),
        escape_osc(message)
    );
    let _ = stdout.write_all(osc777.as_bytes());

    let _ = stdout.flush();
}

/// Escapes special characters for OSC sequences
fn escape_osc(s: &str) -> String {
    // OSC sequences are terminated by BEL or ST, so strip those
    s.replace('\x07', "")
        .replace('\x1b', "")
        .replace('\n', " ")
        .replace('\r', "")
}

/// Plays a short notification sound through a detached system player.
///
/// On macOS uses `afplay`; on Linux tries `paplay` then `aplay`.
/// Never blocks and ignores all failures.
pub fn play_effect_sound() {
    #[cfg(target_os = "macos")]
    {
        let _ = Command::new("afplay")
            .arg("/System/Library/Sounds/Funk.aiff")
            .spawn();
    }

    #[cfg(target_os = "linux")]
    {
        let candidates = [
            "/usr/share/sounds/freedesktop/stereo/message-new-instant.oga",
            "/usr/share/sounds/gnome/default/alerts/drip.ogg",
        ];
        if let Some(path) = candidates
            .iter()
            .copied()
            .find(|p| std::path::Path::new(p).exists())
        {
            if Command::new("paplay").arg(path).spawn().is_err() {
                let _ = Command::new("aplay").arg("-q").arg(path).spawn();
            }
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }
}

/// Prints a transient full-width overlay banner
pub fn show_overlay_banner(text: &str) {
    let line = "=".repeat(60);
    println!("\n{}\n  {}\n{}\n", line, text, line);
}

/// Renders a modal-style alert box and raises a desktop notification
pub fn show_modal_alert(message: &str) {
    emit_terminal_notification("SYSTEM MESSAGE", message);
    let width = message.chars().count().max(20) + 4;
    let border = "-".repeat(width);
    println!("+{}+", border);
    println!("|  {}  |", message);
    println!("+{}+", border);
}

/// [`CommandHandler`] that renders every command as a terminal effect.
///
/// `close` does not exit directly; it flips a watch channel so the host can
/// tear the session down and terminate on its own terms.
pub struct TerminalEffects {
    close_tx: watch::Sender<bool>,
}

impl TerminalEffects {
    /// Returns the handler and the receiver that observes `close` commands
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (close_tx, close_rx) = watch::channel(false);
        (Self { close_tx }, close_rx)
    }
}

impl CommandHandler for TerminalEffects {
    fn handle(&self, command: AdminCommand) {
        match command {
            AdminCommand::Troll => {
                show_overlay_banner("~ you have been trolled ~");
            }
            AdminCommand::Axel => {
                play_effect_sound();
            }
            AdminCommand::FakeMsg => {
                show_modal_alert(
                    "SYSTEM MESSAGE: Critical kernel error detected. Do not power off your computer.",
                );
            }
            AdminCommand::Close => {
                let _ = self.close_tx.send(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_osc_removes_control_chars() {
        assert_eq!(escape_osc("hello\x07world"), "helloworld");
        assert_eq!(escape_osc("test\x1b[0m"), "test[0m");
        assert_eq!(escape_osc("line1\nline2"), "line1 line2");
    }

    #[test]
    fn close_command_flips_the_watch_channel() {
        let (effects, close_rx) = TerminalEffects::new();

        assert!(!*close_rx.borrow());
        effects.handle(AdminCommand::Close);
        assert!(*close_rx.borrow());
    }

    #[test]
    fn non_close_commands_leave_the_channel_untouched() {
        let (effects, close_rx) = TerminalEffects::new();

        effects.handle(AdminCommand::Troll);
        effects.handle(AdminCommand::Axel);
        assert!(!*close_rx.borrow());
    }
}

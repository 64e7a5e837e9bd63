// Per-user command mailbox
//
// One envelope slot per user (`cmd_<username>.json`): the admin writes, the
// target session consumes with read-and-delete. Sending never waits for the
// target to be online; an envelope sits in the slot until the next poll,
// indefinitely if that never happens.

use crate::session::config::Config;
use crate::session::protocol::{AdminCommand, CommandEnvelope};
use crate::session::store::SlotStore;
use anyhow::Result;

fn command_key(username: &str) -> String {
    format!("cmd_{}.json", username)
}

pub struct CommandMailbox {
    store: SlotStore,
}

impl CommandMailbox {
    pub fn new(config: &Config) -> Self {
        Self {
            store: SlotStore::new(config.system_dir()),
        }
    }

    /// Place a command in the user's slot, overwriting any pending envelope.
    ///
    /// Last-write-wins: two rapid sends leave only the later command. There
    /// is no delivery acknowledgement of any kind.
    pub fn send(&self, username: &str, command: AdminCommand) -> Result<()> {
        let envelope = CommandEnvelope::new(command);
        self.store.put(&command_key(username), &envelope.to_json()?)
    }

    /// Consume the pending command for `username`, if any.
    ///
    /// At-most-once: the slot is deleted as part of the read, so a session
    /// that crashes mid-handling loses the command rather than retrying it.
    /// Malformed envelopes and unknown command identifiers are cleared and
    /// reported as no-command, so a bad slot cannot wedge the dispatcher.
    pub fn poll(&self, username: &str) -> Option<AdminCommand> {
        let contents = match self.store.take(&command_key(username)) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                eprintln!("Warning: command poll failed for {}: {}", username, e);
                return None;
            }
        };

        match CommandEnvelope::from_json(&contents) {
            Ok(envelope) => match envelope.parse_command() {
                Some(command) => Some(command),
                None => {
                    eprintln!(
                        "Warning: ignoring unknown command {:?} for {}",
                        envelope.command, username
                    );
                    None
                }
            },
            Err(e) => {
                eprintln!("Warning: discarding malformed envelope for {}: {}", username, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config() -> (Config, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
        };
        (config, temp_dir)
    }

    fn slot_path(config: &Config, username: &str) -> std::path::PathBuf {
        config.system_dir().join(command_key(username))
    }

    #[test]
    fn test_send_then_poll_once() {
        let (config, _temp) = test_config();
        let mailbox = CommandMailbox::new(&config);

        mailbox.send("bob", AdminCommand::Close).unwrap();

        assert_eq!(mailbox.poll("bob"), Some(AdminCommand::Close));
        // Consumed on read: the second poll sees nothing
        assert_eq!(mailbox.poll("bob"), None);
    }

    #[test]
    fn test_poll_empty_is_none() {
        let (config, _temp) = test_config();
        let mailbox = CommandMailbox::new(&config);

        assert_eq!(mailbox.poll("bob"), None);
    }

    #[test]
    fn test_rapid_sends_keep_only_the_latest() {
        let (config, _temp) = test_config();
        let mailbox = CommandMailbox::new(&config);

        mailbox.send("bob", AdminCommand::Troll).unwrap();
        mailbox.send("bob", AdminCommand::Axel).unwrap();

        // The earlier command is overwritten, not queued
        assert_eq!(mailbox.poll("bob"), Some(AdminCommand::Axel));
        assert_eq!(mailbox.poll("bob"), None);
    }

    #[test]
    fn test_slots_are_per_user() {
        let (config, _temp) = test_config();
        let mailbox = CommandMailbox::new(&config);

        mailbox.send("bob", AdminCommand::Axel).unwrap();

        assert_eq!(mailbox.poll("alice"), None);
        assert_eq!(mailbox.poll("bob"), Some(AdminCommand::Axel));
    }

    #[test]
    fn test_malformed_envelope_is_cleared() {
        let (config, _temp) = test_config();
        let mailbox = CommandMailbox::new(&config);

        std::fs::create_dir_all(config.system_dir()).unwrap();
        std::fs::write(slot_path(&config, "bob"), "{not json").unwrap();

        assert_eq!(mailbox.poll("bob"), None);
        // The bad slot must not stick around re-failing forever
        assert!(!slot_path(&config, "bob").exists());
    }

    #[test]
    fn test_unknown_command_is_cleared() {
        let (config, _temp) = test_config();
        let mailbox = CommandMailbox::new(&config);

        std::fs::create_dir_all(config.system_dir()).unwrap();
        std::fs::write(
            slot_path(&config, "bob"),
            r#"{"command":"frobnicate","timestamp":1700000000000}"#,
        )
        .unwrap();

        assert_eq!(mailbox.poll("bob"), None);
        assert!(!slot_path(&config, "bob").exists());
    }
}

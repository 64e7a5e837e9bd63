// Command protocol shared by the admin console and client sessions
// Commands travel as single-slot JSON envelopes through the .system directory

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Commands an admin can push to a client session.
///
/// The set is closed on the Rust side, but stored envelopes may carry
/// identifiers from newer versions; those fail `FromStr` and the mailbox
/// clears them without dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// Show a transient overlay video/banner
    Troll,
    /// Play a sound effect
    Axel,
    /// Terminate the target application
    Close,
    /// Display a deceptive modal alert
    FakeMsg,
}

impl AdminCommand {
    /// All commands, in the order the admin console presents them
    pub const ALL: [AdminCommand; 4] = [
        AdminCommand::Troll,
        AdminCommand::Axel,
        AdminCommand::Close,
        AdminCommand::FakeMsg,
    ];
}

impl std::fmt::Display for AdminCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminCommand::Troll => write!(f, "troll"),
            AdminCommand::Axel => write!(f, "axel"),
            AdminCommand::Close => write!(f, "close"),
            AdminCommand::FakeMsg => write!(f, "fake_msg"),
        }
    }
}

impl std::str::FromStr for AdminCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "troll" => Ok(AdminCommand::Troll),
            "axel" => Ok(AdminCommand::Axel),
            "close" => Ok(AdminCommand::Close),
            "fake_msg" => Ok(AdminCommand::FakeMsg),
            _ => Err(format!("Unknown admin command: {}", s)),
        }
    }
}

/// A pending command for one user, stored as `cmd_<username>.json`.
///
/// One envelope slot exists per user; a new send overwrites any pending
/// envelope (last-write-wins, no queueing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Command identifier; kept as a raw string so unknown identifiers
    /// survive deserialization and can be discarded deliberately
    pub command: String,
    /// Epoch millis at dispatch; recorded for audit, not used for expiry
    pub timestamp: i64,
}

impl CommandEnvelope {
    pub fn new(command: AdminCommand) -> Self {
        Self {
            command: command.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Parse the stored identifier against the known command set
    pub fn parse_command(&self) -> Option<AdminCommand> {
        self.command.parse().ok()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_roundtrip() {
        for command in AdminCommand::ALL {
            let s = command.to_string();
            let parsed: AdminCommand = s.parse().unwrap();
            assert_eq!(command, parsed);
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!("reboot".parse::<AdminCommand>().is_err());
        assert!("".parse::<AdminCommand>().is_err());
        // Identifiers are case-sensitive
        assert!("Troll".parse::<AdminCommand>().is_err());
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = CommandEnvelope::new(AdminCommand::FakeMsg);
        let json = envelope.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["command"], "fake_msg");
        assert!(value["timestamp"].is_i64());
    }

    #[test]
    fn test_envelope_tolerates_unknown_command() {
        let json = r#"{"command":"frobnicate","timestamp":1700000000000}"#;
        let envelope = CommandEnvelope::from_json(json).unwrap();
        assert_eq!(envelope.command, "frobnicate");
        assert!(envelope.parse_command().is_none());
    }
}

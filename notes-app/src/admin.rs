// Admin console: presence queries and command dispatch
//
// Only admin sessions may open the console. Dispatching is optimistic: the
// receipt confirms the envelope was written, never that the target saw it -
// sending to an offline user just parks the command in their slot.

use crate::auth::{AuthenticatedUser, UserRegistry};
use crate::session::config::Config;
use crate::session::mailbox::CommandMailbox;
use crate::session::presence::PresenceOracle;
use crate::session::protocol::AdminCommand;
use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};

/// Online/offline view of one target user
#[derive(Debug, Clone)]
pub struct TargetStatus {
    pub username: String,
    pub online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Local confirmation that a command envelope was written
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub username: String,
    pub command: AdminCommand,
    pub sent_at: DateTime<Utc>,
}

pub struct AdminConsole {
    config: Config,
    presence: PresenceOracle,
    mailbox: CommandMailbox,
}

impl AdminConsole {
    /// Open the console for an admin session; refuses everyone else
    pub fn open(config: &Config, user: &AuthenticatedUser) -> Result<Self> {
        ensure!(
            user.is_admin,
            "user {} is not an administrator",
            user.username
        );
        Ok(Self {
            config: config.clone(),
            presence: PresenceOracle::new(config),
            mailbox: CommandMailbox::new(config),
        })
    }

    /// Usernames that can be targeted. Admin accounts are excluded: they
    /// are neither targets nor deletable.
    pub fn list_users(&self) -> Result<Vec<String>> {
        let registry = UserRegistry::load(&self.config)?;
        Ok(registry
            .users
            .iter()
            .filter(|u| !u.is_admin)
            .map(|u| u.username.clone())
            .collect())
    }

    /// Presence view for one target, as shown when the admin selects a user
    pub fn target_status(&self, username: &str) -> TargetStatus {
        TargetStatus {
            username: username.to_string(),
            online: self.presence.is_online(username),
            last_seen: self.presence.last_seen(username),
        }
    }

    /// Write a command into the target's slot and report it sent.
    /// This is a UI-level notification, not a delivery guarantee.
    pub fn dispatch(&self, username: &str, command: AdminCommand) -> Result<DispatchReceipt> {
        self.mailbox.send(username, command)?;
        Ok(DispatchReceipt {
            username: username.to_string(),
            command,
            sent_at: Utc::now(),
        })
    }

    /// Delete a non-admin account; returns false when the user is missing
    /// or is an admin
    pub fn delete_account(&self, username: &str) -> Result<bool> {
        let mut registry = UserRegistry::load(&self.config)?;

        match registry.find(username) {
            Some(user) if user.is_admin => return Ok(false),
            None => return Ok(false),
            Some(_) => {}
        }

        registry.remove(username);
        registry.save(&self.config)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;
    use crate::session::presence::HeartbeatStore;
    use tempfile::TempDir;

    fn admin_setup() -> (Config, AdminConsole, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
        };
        let admin = auth::login(&config, "Admin", "Test009").unwrap();
        let console = AdminConsole::open(&config, &admin).unwrap();
        (config, console, temp_dir)
    }

    #[test]
    fn test_non_admin_cannot_open_console() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
        };
        auth::register(&config, "alice", "pw").unwrap();
        let alice = auth::login(&config, "alice", "pw").unwrap();

        assert!(AdminConsole::open(&config, &alice).is_err());
    }

    #[test]
    fn test_list_users_excludes_admins() {
        let (config, console, _temp) = admin_setup();
        auth::register(&config, "alice", "pw").unwrap();
        auth::register(&config, "bob", "pw").unwrap();

        let mut users = console.list_users().unwrap();
        users.sort();
        assert_eq!(users, vec!["alice", "bob"]);
    }

    #[test]
    fn test_target_status_reflects_presence() {
        let (config, console, _temp) = admin_setup();
        auth::register(&config, "alice", "pw").unwrap();

        let status = console.target_status("alice");
        assert!(!status.online);
        assert!(status.last_seen.is_none());

        HeartbeatStore::new(&config).record("alice");
        let status = console.target_status("alice");
        assert!(status.online);
        assert!(status.last_seen.is_some());
    }

    #[test]
    fn test_dispatch_writes_the_mailbox() {
        let (config, console, _temp) = admin_setup();

        let receipt = console.dispatch("bob", AdminCommand::Troll).unwrap();
        assert_eq!(receipt.username, "bob");
        assert_eq!(receipt.command, AdminCommand::Troll);

        assert_eq!(
            CommandMailbox::new(&config).poll("bob"),
            Some(AdminCommand::Troll)
        );
    }

    #[test]
    fn test_dispatch_to_offline_user_succeeds() {
        let (_config, console, _temp) = admin_setup();

        // No heartbeat for "ghost" anywhere; the send still succeeds
        assert!(!console.target_status("ghost").online);
        console.dispatch("ghost", AdminCommand::Axel).unwrap();
    }

    #[test]
    fn test_delete_account_guards_admins() {
        let (config, console, _temp) = admin_setup();
        auth::register(&config, "alice", "pw").unwrap();

        assert!(!console.delete_account("Admin").unwrap());
        assert!(!console.delete_account("missing").unwrap());
        assert!(console.delete_account("alice").unwrap());

        let registry = UserRegistry::load(&config).unwrap();
        assert!(registry.find("Admin").is_some());
        assert!(registry.find("alice").is_none());
    }
}

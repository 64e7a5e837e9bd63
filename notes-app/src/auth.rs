// User registry and authentication
// users.json is a flat array of records compared in plaintext, as in the
// original application. Writes hold an exclusive advisory lock so two
// processes sharing the data directory cannot interleave a save.

use crate::session::config::Config;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use thiserror::Error;

/// Username and password seeded into a fresh registry
const DEFAULT_ADMIN_USERNAME: &str = "Admin";
const DEFAULT_ADMIN_PASSWORD: &str = "Test009";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("user {0} already exists")]
    UserExists(String),
    #[error("invalid username: {0}")]
    InvalidUsername(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// One account in users.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// The identity of a logged-in user, handed to the session layer
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub is_admin: bool,
}

/// Flat-file user registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRegistry {
    pub users: Vec<UserRecord>,
}

impl UserRegistry {
    /// Load the registry from disk, seeding the default admin account on
    /// first run
    pub fn load(config: &Config) -> Result<Self> {
        let path = config.users_file();

        if !path.exists() {
            let registry = Self::seeded();
            registry.save(config)?;
            return Ok(registry);
        }

        let mut file = File::open(&path)
            .with_context(|| format!("Failed to open users file: {}", path.display()))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("Failed to read users file: {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse users file: {}", path.display()))
    }

    fn seeded() -> Self {
        Self {
            users: vec![UserRecord {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password: DEFAULT_ADMIN_PASSWORD.to_string(),
                is_admin: true,
            }],
        }
    }

    /// Save the registry to disk with exclusive file locking
    pub fn save(&self, config: &Config) -> Result<()> {
        let path = config.users_file();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open users file for writing: {}", path.display()))?;

        // Acquire exclusive lock (blocking)
        file.lock_exclusive()
            .with_context(|| "Failed to acquire exclusive lock on users file")?;

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize users")?;

        file.write_all(contents.as_bytes())
            .with_context(|| "Failed to write users file")?;

        // Lock is automatically released when file is dropped
        Ok(())
    }

    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Remove a user by name; returns false if no such user existed
    pub fn remove(&mut self, username: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.username != username);
        self.users.len() != before
    }
}

/// Validate credentials and prepare the user's notes directory
pub fn login(config: &Config, username: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
    let registry = UserRegistry::load(config)?;

    let user = registry
        .find(username)
        .filter(|u| u.password == password)
        .ok_or(AuthError::InvalidCredentials)?;

    fs::create_dir_all(config.user_notes_dir(username))
        .with_context(|| format!("Failed to create notes directory for {}", username))?;

    Ok(AuthenticatedUser {
        username: user.username.clone(),
        is_admin: user.is_admin,
    })
}

/// Create a new non-admin account and log it in
pub fn register(
    config: &Config,
    username: &str,
    password: &str,
) -> Result<AuthenticatedUser, AuthError> {
    validate_username(username)?;

    let mut registry = UserRegistry::load(config)?;
    if registry.find(username).is_some() {
        return Err(AuthError::UserExists(username.to_string()));
    }

    registry.users.push(UserRecord {
        username: username.to_string(),
        password: password.to_string(),
        is_admin: false,
    });
    registry.save(config)?;

    fs::create_dir_all(config.user_notes_dir(username))
        .with_context(|| format!("Failed to create notes directory for {}", username))?;

    Ok(AuthenticatedUser {
        username: username.to_string(),
        is_admin: false,
    })
}

/// Usernames become directory and slot-file names, so they must be plain
fn validate_username(username: &str) -> Result<(), AuthError> {
    let bad = username.is_empty()
        || username.starts_with('.')
        || username
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        return Err(AuthError::InvalidUsername(username.to_string()));
    }
    Ok(())
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

    #[test]
    fn test_first_load_seeds_admin() {
        let (config, _temp) = test_config();

        let registry = UserRegistry::load(&config).unwrap();
        let admin = registry.find("Admin").unwrap();
        assert!(admin.is_admin);

        // The seed was persisted, not just returned
        assert!(config.users_file().exists());
    }

    #[test]
    fn test_login_with_seeded_admin() {
        let (config, _temp) = test_config();

        let user = login(&config, "Admin", "Test009").unwrap();
        assert!(user.is_admin);
        assert_eq!(user.username, "Admin");
    }

    #[test]
    fn test_login_rejects_bad_password() {
        let (config, _temp) = test_config();

        let err = login(&config, "Admin", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_login_rejects_unknown_user() {
        let (config, _temp) = test_config();

        let err = login(&config, "nobody", "pw").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_register_then_login() {
        let (config, _temp) = test_config();

        let user = register(&config, "alice", "secret").unwrap();
        assert!(!user.is_admin);
        assert!(config.user_notes_dir("alice").is_dir());

        let user = login(&config, "alice", "secret").unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let (config, _temp) = test_config();

        register(&config, "alice", "one").unwrap();
        let err = register(&config, "alice", "two").unwrap_err();
        assert!(matches!(err, AuthError::UserExists(_)));
    }

    #[test]
    fn test_register_rejects_path_like_usernames() {
        let (config, _temp) = test_config();

        for name in ["", "../evil", "a/b", "a\\b", ".hidden"] {
            let err = register(&config, name, "pw").unwrap_err();
            assert!(matches!(err, AuthError::InvalidUsername(_)), "{:?}", name);
        }
    }

    #[test]
    fn test_remove_user() {
        let (config, _temp) = test_config();
        register(&config, "alice", "pw").unwrap();

        let mut registry = UserRegistry::load(&config).unwrap();
        assert!(registry.remove("alice"));
        assert!(!registry.remove("alice"));
        registry.save(&config).unwrap();

        let reloaded = UserRegistry::load(&config).unwrap();
        assert!(reloaded.find("alice").is_none());
    }
}

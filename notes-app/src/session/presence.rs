// Presence tracking through heartbeat markers
//
// Each active session refreshes `hb_<username>.txt` on a fixed cadence.
// Liveness is inferred from the marker's mtime; a marker is never deleted,
// it just goes stale. Absence of a marker and a stale marker both read as
// offline.

use crate::session::config::Config;
use crate::session::store::SlotStore;
use chrono::{DateTime, Utc};
use std::time::{Duration, SystemTime};

/// How often an active session refreshes its heartbeat marker
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Age at which a heartbeat marker stops counting as online.
/// Kept at 2x the heartbeat cadence so one missed beat does not flap the
/// status to offline.
pub const STALE_AFTER: Duration = Duration::from_secs(10);

fn heartbeat_key(username: &str) -> String {
    format!("hb_{}.txt", username)
}

/// Writer side: refreshes the per-user liveness marker
pub struct HeartbeatStore {
    store: SlotStore,
}

impl HeartbeatStore {
    pub fn new(config: &Config) -> Self {
        Self {
            store: SlotStore::new(config.system_dir()),
        }
    }

    /// Refresh the liveness marker for `username` with the current time.
    ///
    /// Best-effort: a failed write is logged and swallowed so transient
    /// storage trouble never disturbs the editing session. The next tick
    /// retries naturally.
    pub fn record(&self, username: &str) {
        let millis = Utc::now().timestamp_millis().to_string();
        if let Err(e) = self.store.put(&heartbeat_key(username), &millis) {
            eprintln!("Warning: heartbeat write failed for {}: {}", username, e);
        }
    }
}

/// Reader side: answers "is this user online" from marker freshness
pub struct PresenceOracle {
    store: SlotStore,
}

impl PresenceOracle {
    pub fn new(config: &Config) -> Self {
        Self {
            store: SlotStore::new(config.system_dir()),
        }
    }

    /// True iff the user's heartbeat marker exists and is younger than
    /// [`STALE_AFTER`]. "Never logged in" and "stale marker" are both
    /// offline; neither is an error.
    pub fn is_online(&self, username: &str) -> bool {
        match self.store.modified(&heartbeat_key(username)) {
            Some(mtime) => match SystemTime::now().duration_since(mtime) {
                Ok(age) => age < STALE_AFTER,
                // mtime in the future means clock skew; count it as fresh
                Err(_) => true,
            },
            None => false,
        }
    }

    /// Timestamp of the user's last heartbeat, if one was ever recorded
    pub fn last_seen(&self, username: &str) -> Option<DateTime<Utc>> {
        self.store
            .modified(&heartbeat_key(username))
            .map(DateTime::<Utc>::from)
    }
}

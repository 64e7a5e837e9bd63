// Periodic background tasks for a logged-in session
//
// Two loops run while a user is logged in: a heartbeat emitter and a
// command poller. Both are scheduled tokio tasks that stop through a shared
// watch channel when the session ends, and neither ever blocks the
// interactive editing path.

use crate::session::config::Config;
use crate::session::mailbox::CommandMailbox;
use crate::session::presence::{HeartbeatStore, HEARTBEAT_INTERVAL};
use crate::session::protocol::AdminCommand;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How often a session polls its command slot
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Executes commands delivered through the mailbox.
///
/// Execution is fire-and-forget: nothing is reported back to the admin.
pub trait CommandHandler: Send + Sync + 'static {
    fn handle(&self, command: AdminCommand);
}

/// Tick intervals for the two session loops.
/// Production uses the defaults; tests inject shorter ones.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    pub heartbeat: Duration,
    pub poll: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            heartbeat: HEARTBEAT_INTERVAL,
            poll: POLL_INTERVAL,
        }
    }
}

/// Handle to the two periodic tasks of one session
pub struct SessionTasks {
    shutdown_tx: watch::Sender<bool>,
    heartbeat: JoinHandle<()>,
    poller: JoinHandle<()>,
}

impl SessionTasks {
    /// Start the heartbeat and command-polling loops for `username`
    pub fn start(config: &Config, username: &str, handler: Arc<dyn CommandHandler>) -> Self {
        Self::start_with_cadence(config, username, handler, Cadence::default())
    }

    pub fn start_with_cadence(
        config: &Config,
        username: &str,
        handler: Arc<dyn CommandHandler>,
        cadence: Cadence,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let heartbeat_store = HeartbeatStore::new(config);
        let heartbeat_user = username.to_string();
        let mut heartbeat_shutdown = shutdown_rx.clone();
        let heartbeat = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cadence.heartbeat);
            loop {
                tokio::select! {
                    // First tick fires immediately, so a fresh login is
                    // visible to the admin without waiting a full interval
                    _ = ticker.tick() => heartbeat_store.record(&heartbeat_user),
                    _ = heartbeat_shutdown.changed() => break,
                }
            }
        });

        let mailbox = CommandMailbox::new(config);
        let poll_user = username.to_string();
        let mut poll_shutdown = shutdown_rx;
        let poller = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cadence.poll);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Some(command) = mailbox.poll(&poll_user) {
                            handler.handle(command);
                        }
                    }
                    _ = poll_shutdown.changed() => break,
                }
            }
        });

        Self {
            shutdown_tx,
            heartbeat,
            poller,
        }
    }

    /// Signal both loops to stop and wait for them to finish.
    /// After this returns the session emits no further heartbeats or polls;
    /// the heartbeat marker decays to offline on its own.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.heartbeat.await;
        let _ = self.poller.await;
    }
}

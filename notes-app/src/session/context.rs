// Session lifecycle
//
// A SessionContext owns the logged-in identity and the periodic background
// tasks tied to that login. Creating one is the "login" side effect for the
// presence subsystem; ending it is the "logout" side. There is no global
// current-user state anywhere else.

use crate::auth::AuthenticatedUser;
use crate::session::config::Config;
use crate::session::dispatcher::{Cadence, CommandHandler, SessionTasks};
use std::sync::Arc;

pub struct SessionContext {
    username: String,
    is_admin: bool,
    tasks: Option<SessionTasks>,
}

impl SessionContext {
    /// Begin a session for an authenticated user, starting the heartbeat
    /// and command-polling loops
    pub fn begin(config: &Config, user: &AuthenticatedUser, handler: Arc<dyn CommandHandler>) -> Self {
        Self::begin_with_cadence(config, user, handler, Cadence::default())
    }

    pub fn begin_with_cadence(
        config: &Config,
        user: &AuthenticatedUser,
        handler: Arc<dyn CommandHandler>,
        cadence: Cadence,
    ) -> Self {
        let tasks = SessionTasks::start_with_cadence(config, &user.username, handler, cadence);
        Self {
            username: user.username.clone(),
            is_admin: user.is_admin,
            tasks: Some(tasks),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// End the session: stop both loops and wait for them.
    ///
    /// No explicit presence teardown happens beyond this; the heartbeat
    /// marker simply stops being refreshed and decays to offline.
    pub async fn end(mut self) {
        if let Some(tasks) = self.tasks.take() {
            tasks.stop().await;
        }
    }
}

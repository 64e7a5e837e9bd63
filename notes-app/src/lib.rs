// Infinity Notes - personal markdown notes with per-user accounts and an
// admin presence/command channel mediated through a shared data directory.
//
// The GUI layer lives elsewhere; this crate is everything it calls into:
// auth, note CRUD, settings, and the session subsystem (heartbeats, the
// command mailbox, and the polling dispatcher).

pub mod admin;
pub mod auth;
pub mod notes;
pub mod session;
pub mod settings;

// Session subsystem: presence, command delivery, and lifecycle
// Shared between the library consumers and the client/admin binaries

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod mailbox;
pub mod notify;
pub mod presence;
pub mod protocol;
pub mod store;

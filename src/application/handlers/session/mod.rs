//! Session command and query handlers.
//!
//! Commands (`create`, `update`, `join`, `leave`, `cancel`) read the session,
//! decide through the domain lifecycle, and apply one versioned write. A
//! lost version race is retried once against a fresh read.

mod cancel_session;
mod create_session;
mod get_session;
mod input;
mod join_session;
mod leave_session;
mod list_sessions;
mod list_user_sessions;
mod support;
mod update_session;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel_session::{CancelSessionCommand, CancelSessionHandler, CancelSessionResult};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use join_session::{JoinSessionCommand, JoinSessionHandler, JoinSessionResult};
pub use leave_session::{LeaveSessionCommand, LeaveSessionHandler, LeaveSessionResult};
pub use list_sessions::{ListSessionsHandler, ListSessionsQuery};
pub use list_user_sessions::{ListUserSessionsHandler, ListUserSessionsQuery};
pub use update_session::{UpdateSessionCommand, UpdateSessionHandler, UpdateSessionResult};

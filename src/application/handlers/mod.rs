//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod session;

pub use session::{
    CancelSessionCommand, CancelSessionHandler, CancelSessionResult, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, GetSessionHandler, GetSessionQuery,
    JoinSessionCommand, JoinSessionHandler, JoinSessionResult, LeaveSessionCommand,
    LeaveSessionHandler, LeaveSessionResult, ListSessionsHandler, ListSessionsQuery,
    ListUserSessionsHandler, ListUserSessionsQuery, UpdateSessionCommand, UpdateSessionHandler,
    UpdateSessionResult,
};

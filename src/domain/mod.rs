//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, statuses, errors, events)
//! - `venue` - Venues, courts and operating hours
//! - `session` - Play session aggregate, roster rules and events

pub mod foundation;
pub mod session;
pub mod venue;

//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the scheduling domain.

mod calendar;
mod command;
mod errors;
mod events;
mod ids;
mod participant_status;
mod session_status;
mod state_machine;
mod timestamp;

pub use calendar::{format_date, format_time, parse_date, parse_time};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{CourtId, ParticipantId, SessionId, UserId, VenueId};
pub use participant_status::ParticipantStatus;
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::{local_now, Timestamp};

//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Captures events in-process for tests
//! - `TracingEventPublisher` - Emits each event as a structured log line

mod in_memory;
mod tracing_publisher;

pub use in_memory::InMemoryEventBus;
pub use tracing_publisher::TracingEventPublisher;

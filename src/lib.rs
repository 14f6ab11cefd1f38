//! BadBuddy - Play-session scheduling for badminton venues
//!
//! Hosts publish sessions on venue courts; players join, wait in line when
//! a session is full, and leave before the cancellation deadline.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

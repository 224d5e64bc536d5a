//! Domain rules for the Darkroom travel-photo backend.
//!
//! This crate holds the two rule engines at the heart of the product (the
//! room lifecycle state machine and the per-plan photo quota tracker) plus
//! the shared enums, value objects, and error taxonomy they rest on.
//!
//! Everything here is pure and synchronous: functions take immutable
//! snapshots and an explicit `now`, perform no I/O, and never read the
//! system clock. Persistence, HTTP, and event delivery live in the
//! sibling crates.

pub mod error;
pub mod localtime;
pub mod membership;
pub mod photo_status;
pub mod plan;
pub mod quota;
pub mod room_lifecycle;
pub mod types;

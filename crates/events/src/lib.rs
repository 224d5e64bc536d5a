//! Darkroom event bus.
//!
//! In-process publish/subscribe hub for domain events:
//!
//! - [`EventBus`]: fan-out hub backed by `tokio::sync::broadcast`.
//! - [`DomainEvent`]: the canonical event envelope.
//!
//! The lifecycle sweeper and the HTTP handlers publish here; the external
//! notification collaborator (or the in-process log relay standing in for
//! it) subscribes. Delivery beyond the process boundary is out of scope.

pub mod bus;

pub use bus::{
    DomainEvent, EventBus, EVENT_PHOTO_RETURNED, EVENT_ROOM_ARCHIVED, EVENT_ROOM_DEVELOPED,
};

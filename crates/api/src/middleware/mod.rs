//! Request extractors and middleware.

pub mod actor;

//! Entity structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `to_domain` conversion into the core crate's value snapshot, parsing
//!   stored status strings into their typed enums

pub mod member;
pub mod photo;
pub mod room;
pub mod user;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod member_repo;
pub mod photo_repo;
pub mod room_repo;
pub mod user_repo;

pub use member_repo::MemberRepo;
pub use photo_repo::PhotoRepo;
pub use room_repo::RoomRepo;
pub use user_repo::UserRepo;

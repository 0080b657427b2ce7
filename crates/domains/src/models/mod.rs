//! # Domain Models
//!
//! These structs represent the core entities of the task board.
//! Entity mutators return whether anything actually changed so use cases
//! can skip persistence and auditing for no-op requests.

pub mod activity;
pub mod board;
pub mod card;
pub mod label;
pub mod list;
pub mod role;
pub mod user;

pub use activity::{Activity, ActivityAction, EntityType};
pub use board::{Board, BoardMember};
pub use card::Card;
pub use label::Label;
pub use list::{ensure_position, List};
pub use role::Role;
pub use user::User;

//! Rooms: the data model, name handling and the store.

pub mod model;
pub mod naming;
pub mod store;

pub use model::{Room, RoomSummary, RoomUser, VotingPattern};
pub use store::RoomStore;

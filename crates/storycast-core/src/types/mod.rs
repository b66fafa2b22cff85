//! Shared data types.

pub mod item;

pub use item::{Item, ItemId, MediaKind, Payload};

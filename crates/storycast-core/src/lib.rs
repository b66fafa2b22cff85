//! # storycast core
//! Item types, collaborator traits, errors, and configuration shared by every
//! storycast crate.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::StorycastConfig;
pub use error::{Result, StorycastError};

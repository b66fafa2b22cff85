//! Collaborator traits the core is written against.

pub mod sink;
pub mod source;

pub use sink::Sink;
pub use source::Source;

//! Shared types and collaborator traits
//!
//! Used by the engine, the roster and the presentation adapter alike.

pub mod traits;
pub mod types;

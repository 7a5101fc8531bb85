//! Program management
//!
//! Holds the two precompiled program variants the materials select between.

pub mod program_registry;

pub use program_registry::{ProgramRegistry, ProgramState};

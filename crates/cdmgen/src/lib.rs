//! Command-line front end for `cdmgen-typegen`.
//!
//! Holds the pieces of the binary that are worth testing on their own:
//! configuration loading and the project writer.

pub mod config;
pub mod writer;

pub use config::CdmgenConfig;
pub use writer::{ProjectInfo, ProjectWriter, WriteError};

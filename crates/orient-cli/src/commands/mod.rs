//! Subcommand implementations.

pub mod info;
pub mod optimize;
pub mod overhangs;

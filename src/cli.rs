//! Command line interface for genre-rank.

pub mod args;
pub mod commands;
pub mod corpus;
pub mod output;

pub use args::*;
pub use commands::*;
pub use output::*;

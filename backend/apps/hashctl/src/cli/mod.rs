//! Command line interface

pub mod commands;
pub mod runner;

pub use commands::Cli;
pub use runner::CommandRunner;

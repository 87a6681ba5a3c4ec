//! CLI Command Definitions
//!
//! Secrets are always read from stdin so they never show up in shell
//! history or the process list.

use clap::{Parser, Subcommand};
use hasher::HashAlgorithm;

/// Password hash tool
///
/// Hashing settings come from `PASSWORD_ALGORITHM`, `PASSWORD_COST` and
/// `PASSWORD_PEPPER` (also read from `.env`).
#[derive(Parser, Debug)]
#[command(name = "hashctl")]
#[command(version, about = "Hash and verify passwords")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hash the secret read from stdin
    Hash {
        /// bcrypt cost factor (4-31), overrides PASSWORD_COST
        #[arg(short, long)]
        cost: Option<u32>,

        /// bcrypt or argon2id, overrides PASSWORD_ALGORITHM
        #[arg(short, long)]
        algorithm: Option<HashAlgorithm>,
    },

    /// Check the secret read from stdin against a stored hash
    ///
    /// Exit status: 0 match, 1 mismatch, 2 malformed hash.
    Verify {
        /// Encoded hash
        #[arg(long)]
        hash: String,
    },

    /// Show the parameters of a stored hash
    Inspect {
        /// Encoded hash
        #[arg(long)]
        hash: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

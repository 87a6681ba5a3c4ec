//! Infrastructure Layer
//!
//! Storage implementations.

pub mod memory;

pub use memory::{InMemoryUserRepository, UserRecord};

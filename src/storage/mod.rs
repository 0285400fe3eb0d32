//! Storage layer for checkbook-cli
//!
//! Provides atomic JSON writes for account state and the append-only CSV
//! check register.

pub mod file_io;
pub mod register;

pub use file_io::{read_json, write_atomic, write_json_atomic};
pub use register::RegisterFile;

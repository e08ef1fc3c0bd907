//! Ordinator build-time configuration
//!
//! Copy this file to your project and keep only the values you change.
//!
//! Usage:
//!   ORD_CONFIG_RS=$PWD/cmd/basic/ord_config.rs cargo build -p ordinator-basic
//!
//! Environment variables still win at runtime:
//!   ORD_STACK_SIZE=262144 ./target/debug/basic

// Stack bytes per routine (16 KB ..= 1 GB)
pub const STACK_SIZE: usize = 256 * 1024;

// Log routine lifecycle at debug level
pub const DEBUG_LOGGING: bool = true;

// Host-side spins per poll in await_blocking
pub const AWAIT_SPINS: u32 = 64;

//! # ordinator-runtime
//!
//! Platform-specific runtime for the Ordinator coroutine scheduler.
//!
//! This crate provides:
//! - Guard-protected routine stacks (mmap, Linux)
//! - Context switching backends (ucontext on glibc, fibers on Windows)
//! - The `Ordinator` routine table with resume / yield / destroy
//! - The blocking-call bridge (`Ordinator::await_blocking`)
//! - Build-time + environment configuration
//!
//! Routine stacks and saved contexts never leave this crate:
//!
//! ```compile_fail
//! use ordinator_runtime::memory::Stack;
//! ```
//!
//! ```compile_fail
//! use ordinator_runtime::backend::Context;
//! ```

pub mod config;
#[cfg(all(target_os = "linux", target_env = "gnu"))]
mod memory;
mod backend;
pub mod scheduler;
pub mod bridge;

mod routine;
mod tls;

// Re-exports
pub use config::{ConfigError, OrdinatorConfig};
pub use scheduler::Ordinator;
pub use backend::BACKEND;
pub use bridge::AWAIT_THREAD_NAME;

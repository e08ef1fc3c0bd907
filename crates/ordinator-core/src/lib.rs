//! # ordinator-core
//!
//! Core types and traits for the Ordinator cooperative coroutine runtime.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Context switching, stack memory and the scheduler itself live in
//! `ordinator-runtime`.
//!
//! ## Modules
//!
//! - `id` - Routine identifier (0 = host)
//! - `state` - Routine lifecycle state
//! - `channel` - Single-consumer FIFO channel built on yield/resume
//! - `error` - Error types
//! - `traits` - Backend and scheduler seams
//! - `kprint` - Kernel-style leveled logging macros
//! - `env` - Environment variable utilities

pub mod id;
pub mod state;
pub mod channel;
pub mod error;
pub mod traits;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use id::RoutineId;
pub use state::RoutineState;
pub use channel::Channel;
pub use error::{MemoryError, SchedError, SchedResult, WorkerError};
pub use traits::{Cooperative, ExecutionContext};
pub use env::{env_get, env_get_bool};

/// Limits shared by the runtime and its configuration
pub mod constants {
    /// Smallest accepted routine stack (16 KB)
    pub const MIN_STACK_SIZE: usize = 16 * 1024;

    /// Largest accepted routine stack (1 GB)
    pub const MAX_STACK_SIZE: usize = 1024 * 1024 * 1024;

    /// Page size assumed when the OS cannot be queried
    pub const FALLBACK_PAGE_SIZE: usize = 4096;
}

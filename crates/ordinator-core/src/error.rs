//! Error types for the Ordinator runtime
//!
//! Only ordinary negative outcomes are represented here. Contract
//! violations (resuming a running routine, yielding from the host,
//! destroying an empty slot) are programming errors and panic instead.

use core::fmt;
use crate::id::RoutineId;

/// Result type for scheduler operations
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors that can occur in scheduler operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    /// No routine occupies this identifier (never created, or destroyed)
    RoutineNotFound(RoutineId),

    /// The routine's body already returned
    RoutineFinished(RoutineId),

    /// Configuration rejected by `validate`
    InvalidConfig(&'static str),

    /// Stack allocation/mapping failed
    MemoryError(MemoryError),

    /// Blocking-call bridge thread error
    WorkerError(WorkerError),

    /// Platform-specific error (errno / GetLastError)
    PlatformError(i32),
}

impl SchedError {
    /// Check if this is one of the "no further work for this routine" outcomes
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            SchedError::RoutineNotFound(_) | SchedError::RoutineFinished(_)
        )
    }
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::RoutineNotFound(id) => write!(f, "routine {} not found", id),
            SchedError::RoutineFinished(id) => write!(f, "routine {} already finished", id),
            SchedError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            SchedError::MemoryError(e) => write!(f, "memory error: {}", e),
            SchedError::WorkerError(e) => write!(f, "worker error: {}", e),
            SchedError::PlatformError(code) => write!(f, "platform error: {}", code),
        }
    }
}

impl std::error::Error for SchedError {}

/// Stack memory errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// mmap (or CreateFiber) failed, with the OS error code
    AllocationFailed(i32),

    /// mprotect on the guard page failed
    ProtectionFailed(i32),

    /// Requested stack size overflows the address space
    InvalidSize,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::AllocationFailed(code) => {
                write!(f, "stack allocation failed (os error {})", code)
            }
            MemoryError::ProtectionFailed(code) => {
                write!(f, "guard page protection failed (os error {})", code)
            }
            MemoryError::InvalidSize => write!(f, "invalid stack size"),
        }
    }
}

impl From<MemoryError> for SchedError {
    fn from(e: MemoryError) -> Self {
        SchedError::MemoryError(e)
    }
}

/// Bridge thread errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// Failed to spawn the bridge thread
    SpawnFailed,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::SpawnFailed => write!(f, "failed to spawn bridge thread"),
        }
    }
}

impl From<WorkerError> for SchedError {
    fn from(e: WorkerError) -> Self {
        SchedError::WorkerError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = SchedError::RoutineFinished(RoutineId::new(3));
        assert_eq!(format!("{}", e), "routine 3 already finished");

        let e = SchedError::MemoryError(MemoryError::AllocationFailed(12));
        assert_eq!(
            format!("{}", e),
            "memory error: stack allocation failed (os error 12)"
        );
    }

    #[test]
    fn test_error_conversion() {
        let sched_err: SchedError = MemoryError::InvalidSize.into();
        assert!(matches!(sched_err, SchedError::MemoryError(MemoryError::InvalidSize)));

        let sched_err: SchedError = WorkerError::SpawnFailed.into();
        assert_eq!(sched_err, SchedError::WorkerError(WorkerError::SpawnFailed));
    }

    #[test]
    fn test_exhausted() {
        assert!(SchedError::RoutineNotFound(RoutineId::new(1)).is_exhausted());
        assert!(SchedError::RoutineFinished(RoutineId::new(1)).is_exhausted());
        assert!(!SchedError::InvalidConfig("x").is_exhausted());
    }
}

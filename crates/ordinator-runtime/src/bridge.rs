//! Blocking-call bridge
//!
//! `await_blocking` runs a blocking closure on a short-lived OS thread
//! while the caller keeps cooperating: a routine yields between polls so
//! its siblings progress, the host spins and then gives up its timeslice.

use crate::scheduler::Ordinator;
use ordinator_core::error::{SchedResult, WorkerError};
use ordinator_core::{kdebug, kwarn};
use std::{hint, panic, thread};

/// Name given to every bridge thread
pub const AWAIT_THREAD_NAME: &str = "ordinator-await";

impl Ordinator {
    /// Run `f` on a helper thread and return its result.
    ///
    /// Inside a routine this yields back to the resumer after every poll,
    /// so the routine only observes completion once something resumes it
    /// again. From the host it busy-waits (`await_spins` spin hints, then
    /// `thread::yield_now`) since there is nobody to yield to.
    ///
    /// A panic in `f` is re-raised in the caller.
    ///
    /// # Errors
    ///
    /// `WorkerError::SpawnFailed` if the helper thread cannot be started.
    pub fn await_blocking<F, T>(&self, f: F) -> SchedResult<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(AWAIT_THREAD_NAME.into())
            .spawn(f)
            .map_err(|e| {
                kwarn!("await: cannot spawn helper thread: {}", e);
                WorkerError::SpawnFailed
            })?;

        let mut polls: u64 = 0;
        while !handle.is_finished() {
            polls += 1;
            if self.current().is_some() {
                self.yield_now();
            } else {
                for _ in 0..self.config().await_spins {
                    hint::spin_loop();
                }
                thread::yield_now();
            }
        }

        if self.config().debug_logging {
            kdebug!("await: done after {} polls", polls);
        }

        match handle.join() {
            Ok(value) => Ok(value),
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

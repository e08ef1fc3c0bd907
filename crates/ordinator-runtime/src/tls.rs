//! Thread-local glue between `resume` and the entry trampoline
//!
//! A fresh context starts in `routine_main` with no arguments, so the
//! scheduler that resumed it is published here for the duration of each
//! `resume` call.

use crate::scheduler::Ordinator;
use std::cell::Cell;
use std::ptr;

thread_local! {
    /// Scheduler currently dispatching on this OS thread
    static ACTIVE: Cell<*const Ordinator> = const { Cell::new(ptr::null()) };
}

/// Publish `ord` as the active scheduler, returning the previous one
#[inline]
pub(crate) fn enter(ord: &Ordinator) -> *const Ordinator {
    ACTIVE.with(|cell| cell.replace(ord as *const Ordinator))
}

/// Restore the value returned by `enter`
#[inline]
pub(crate) fn leave(prev: *const Ordinator) {
    ACTIVE.with(|cell| cell.set(prev));
}

/// Active scheduler, or null outside any `resume`
#[inline]
pub(crate) fn active() -> *const Ordinator {
    ACTIVE.with(|cell| cell.get())
}

//! Platform and scheduler traits
//!
//! These traits define the seams between the platform-agnostic core
//! and the platform-specific runtime.

use crate::id::RoutineId;
use crate::error::SchedResult;
use std::ops::Deref;
use std::pin::Pin;

/// Context-switch backend contract
///
/// Every backend must be indistinguishable from the scheduler's point of
/// view: same suspension points, same failure conditions. A context owns
/// its stack exclusively; nothing outside the backend ever sees the stack
/// memory.
pub trait ExecutionContext: Sized {
    /// Save slot for the OS thread's own context (the implicit routine 0)
    fn host() -> SchedResult<Self>;

    /// Fresh context on its own stack of at least `stack_size` bytes
    ///
    /// When first switched to, it runs the runtime's entry trampoline.
    fn spawn(stack_size: usize) -> SchedResult<Self>;

    /// Save the running context into `from` and continue `to`
    ///
    /// Returns when some later switch targets `from` again.
    ///
    /// # Safety
    ///
    /// `from` must describe the context that is executing right now and
    /// `to` must be a host context or a spawned context that is not
    /// executing. Both must stay at the same address until the switch
    /// back completes.
    unsafe fn switch(from: *mut Self, to: *const Self);

    /// Assert that the executing stack pointer lies inside this
    /// context's stack allocation
    ///
    /// Must be called while running on this context.
    fn check_stack(&self);
}

/// What a cooperative primitive needs from its scheduler
///
/// `Channel` is written against this trait so it can live in the core
/// crate without knowing the concrete scheduler.
pub trait Cooperative {
    /// Routine currently executing (`RoutineId::NONE` in the host)
    fn current(&self) -> RoutineId;

    /// Suspend the current routine back to whoever resumed it
    fn yield_now(&self);

    /// Resume `id` if it is parked (created or suspended); no-op otherwise
    ///
    /// Best effort: a resume that fails (e.g. the first stack cannot be
    /// mapped) is logged and swallowed.
    fn wake(&self, id: RoutineId);
}

/// Pinned schedulers (`Pin<Box<Ordinator>>`) cooperate like the scheduler itself
impl<P> Cooperative for Pin<P>
where
    P: Deref,
    P::Target: Cooperative,
{
    #[inline]
    fn current(&self) -> RoutineId {
        (**self).current()
    }

    #[inline]
    fn yield_now(&self) {
        (**self).yield_now()
    }

    #[inline]
    fn wake(&self, id: RoutineId) {
        (**self).wake(id)
    }
}

//! Routine record: body, state, saved context
//!
//! All fields use interior mutability because a routine is reached
//! through a shared `Rc` from both the table and the frames of whoever
//! is resuming it. No borrow is ever held across a context switch.

use crate::backend::Context;
use crate::scheduler::Ordinator;
use ordinator_core::error::SchedResult;
use ordinator_core::id::RoutineId;
use ordinator_core::state::RoutineState;
use ordinator_core::traits::ExecutionContext;
use std::any::Any;
use std::cell::{Cell, UnsafeCell};

/// Routine body, invoked exactly once on the routine's own stack
pub(crate) type Body = Box<dyn FnOnce(&Ordinator) + 'static>;

/// Panic payload carried from a routine back to its resumer
pub(crate) type Payload = Box<dyn Any + Send + 'static>;

pub(crate) struct Routine {
    id: RoutineId,

    /// Taken by the entry trampoline on first run
    body: Cell<Option<Body>>,

    state: Cell<RoutineState>,

    /// Who issued the `resume` currently (or last) running us
    resumer: Cell<RoutineId>,

    /// Built lazily on first resume, dropped once finished
    context: UnsafeCell<Option<Context>>,

    /// Panic that escaped the body, re-raised by `resume`
    panic: Cell<Option<Payload>>,
}

impl Routine {
    pub(crate) fn new(id: RoutineId, body: Body) -> Self {
        Self {
            id,
            body: Cell::new(Some(body)),
            state: Cell::new(RoutineState::Created),
            resumer: Cell::new(RoutineId::NONE),
            context: UnsafeCell::new(None),
            panic: Cell::new(None),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> RoutineId {
        self.id
    }

    #[inline]
    pub(crate) fn state(&self) -> RoutineState {
        self.state.get()
    }

    #[inline]
    pub(crate) fn set_state(&self, state: RoutineState) {
        self.state.set(state);
    }

    #[inline]
    pub(crate) fn resumer(&self) -> RoutineId {
        self.resumer.get()
    }

    #[inline]
    pub(crate) fn set_resumer(&self, id: RoutineId) {
        self.resumer.set(id);
    }

    pub(crate) fn take_body(&self) -> Option<Body> {
        self.body.take()
    }

    pub(crate) fn set_panic(&self, payload: Payload) {
        self.panic.set(Some(payload));
    }

    pub(crate) fn take_panic(&self) -> Option<Payload> {
        self.panic.take()
    }

    /// Allocate the stack and build the context, once
    pub(crate) fn prepare(&self, stack_size: usize) -> SchedResult<()> {
        // Only the host-side resume path gets here, while we are not executing
        let slot = unsafe { &mut *self.context.get() };
        if slot.is_none() {
            *slot = Some(Context::spawn(stack_size)?);
        }
        Ok(())
    }

    /// Raw pointer to the saved context, for `ExecutionContext::switch`
    ///
    /// # Panics
    ///
    /// If the context was never built or already released.
    pub(crate) fn context_ptr(&self) -> *mut Context {
        match unsafe { (*self.context.get()).as_mut() } {
            Some(ctx) => ctx as *mut Context,
            None => panic!("routine {} has no execution context", self.id),
        }
    }

    /// Drop the context and unmap the stack
    ///
    /// Must run on some other stack, after the body has returned.
    pub(crate) fn release_context(&self) {
        debug_assert!(self.state().is_finished());
        unsafe {
            *self.context.get() = None;
        }
    }

    /// Corruption detector, called from inside the routine at each yield
    pub(crate) fn check_stack(&self) {
        if let Some(ctx) = unsafe { (*self.context.get()).as_ref() } {
            ctx.check_stack();
        }
    }
}

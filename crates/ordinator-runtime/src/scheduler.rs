//! Routine table and the resume/yield protocol
//!
//! An `Ordinator` owns every routine created through it and is bound to
//! the OS thread that built it. Exactly one context runs at a time: the
//! host (the thread's original stack) or one routine. Control moves only
//! through `resume` (down the chain) and `yield_now` / body completion
//! (back to whoever resumed).
//!
//! Resumes nest: a routine may resume another, and that routine's yields
//! come back to it rather than to the host.

use crate::backend::{Context, BACKEND};
use crate::config::OrdinatorConfig;
use crate::routine::Routine;
use crate::tls;

use ordinator_core::error::{SchedError, SchedResult};
use ordinator_core::id::RoutineId;
use ordinator_core::kprint;
use ordinator_core::state::RoutineState;
use ordinator_core::traits::{Cooperative, ExecutionContext};
use ordinator_core::{kdebug, kerror, kwarn};

use std::cell::{Cell, RefCell, UnsafeCell};
use std::collections::VecDeque;
use std::marker::PhantomPinned;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::process;
use std::rc::Rc;

/// Cooperative routine scheduler
///
/// Not `Send`: every context it owns was created on, and may only be
/// switched to from, the thread that built it.
///
/// Only ever handed out as `Pin<Box<Ordinator>>`. Suspended routines hold
/// `&Ordinator` on their own stacks, so the scheduler must stay put
/// while the handle itself moves freely.
pub struct Ordinator {
    config: OrdinatorConfig,

    /// Slot `n` holds routine id `n + 1`; `None` once destroyed
    routines: RefCell<Vec<Option<Rc<Routine>>>>,

    /// Destroyed ids, reused oldest first
    free_ids: RefCell<VecDeque<RoutineId>>,

    /// Running routine, `RoutineId::NONE` for the host
    current: Cell<RoutineId>,

    /// Saved state of the host whenever a routine runs.
    /// Declared last: routine contexts must go before the thread fiber.
    host: UnsafeCell<Context>,

    _pin: PhantomPinned,
}

impl Ordinator {
    /// Build a scheduler on the calling thread, pinned on the heap
    pub fn new(config: OrdinatorConfig) -> SchedResult<Pin<Box<Self>>> {
        config.validate()?;
        let host = Context::host()?;

        if config.debug_logging {
            kdebug!(
                "ordinator up: backend={} stack_size={}",
                BACKEND,
                config.stack_size
            );
        }

        Ok(Box::pin(Self {
            config,
            routines: RefCell::new(Vec::new()),
            free_ids: RefCell::new(VecDeque::new()),
            current: Cell::new(RoutineId::NONE),
            host: UnsafeCell::new(host),
            _pin: PhantomPinned,
        }))
    }

    /// Scheduler with defaults and `ORD_*` environment overrides
    pub fn from_env() -> SchedResult<Pin<Box<Self>>> {
        Self::new(OrdinatorConfig::from_env())
    }

    /// Register a new routine in the Created state.
    ///
    /// Nothing runs and no stack is allocated until the first `resume`.
    /// Ids left free by `destroy` are handed out again before new ones.
    pub fn create<F>(&self, body: F) -> RoutineId
    where
        F: FnOnce(&Ordinator) + 'static,
    {
        let mut routines = self.routines.borrow_mut();
        let id = match self.free_ids.borrow_mut().pop_front() {
            Some(id) => {
                debug_assert!(routines[id.slot()].is_none(), "free id {} still occupied", id);
                id
            }
            None => {
                routines.push(None);
                RoutineId::from_slot(routines.len() - 1)
            }
        };
        routines[id.slot()] = Some(Rc::new(Routine::new(id, Box::new(body))));
        drop(routines);

        if self.config.debug_logging {
            kdebug!("created routine {}", id);
        }
        id
    }

    /// Remove a routine and free its id.
    ///
    /// A Suspended routine is discarded without unwinding its stack:
    /// whatever its live frames own is leaked.
    ///
    /// # Panics
    ///
    /// If `id` does not name a live routine, or names one that is
    /// currently running (including any routine on the resume chain).
    pub fn destroy(&self, id: RoutineId) {
        assert!(id.is_some(), "destroy: id 0 names the host context");

        let routine = {
            let mut routines = self.routines.borrow_mut();
            let state = match routines.get(id.slot()) {
                Some(Some(routine)) => routine.state(),
                _ => panic!("destroy: routine {} does not exist", id),
            };
            assert!(
                state != RoutineState::Running,
                "destroy: routine {} is running",
                id
            );
            routines[id.slot()].take()
        };
        self.free_ids.borrow_mut().push_back(id);

        if self.config.debug_logging {
            kdebug!("destroyed routine {}", id);
        }
        // Body captures and stack are released outside the table borrow
        drop(routine);
    }

    /// Run routine `id` until it yields or finishes.
    ///
    /// The caller (host or another routine) is suspended inside this call
    /// and becomes the target of the routine's next yield. A panic that
    /// escapes the routine's body is re-raised here.
    ///
    /// # Errors
    ///
    /// - `RoutineNotFound` if `id` was never created or has been destroyed
    /// - `RoutineFinished` if its body already returned
    /// - `MemoryError` / `PlatformError` if its first stack cannot be built;
    ///   the routine stays Created
    ///
    /// # Panics
    ///
    /// If the routine is Running: resuming yourself or any routine that is
    /// waiting further up the resume chain.
    pub fn resume(&self, id: RoutineId) -> SchedResult<()> {
        let routine = self.lookup(id).ok_or(SchedError::RoutineNotFound(id))?;

        match routine.state() {
            RoutineState::Finished => return Err(SchedError::RoutineFinished(id)),
            RoutineState::Running => panic!("resume: routine {} is already running", id),
            RoutineState::Created => routine.prepare(self.config.stack_size)?,
            RoutineState::Suspended => {}
        }

        let resumer = self.current.get();
        let from = self.context_ptr(resumer);
        let to = routine.context_ptr();

        routine.set_resumer(resumer);
        routine.set_state(RoutineState::Running);
        self.current.set(id);

        if self.config.debug_logging {
            kdebug!("resume {} -> {}", resumer, id);
        }

        let prev = tls::enter(self);
        kprint::set_routine_tag(id.as_u32());
        unsafe {
            Context::switch(from, to);
        }
        if resumer.is_none() {
            kprint::clear_routine_tag();
        } else {
            kprint::set_routine_tag(resumer.as_u32());
        }
        tls::leave(prev);

        debug_assert_eq!(self.current.get(), resumer);

        if routine.state().is_finished() {
            // Back on our own stack, so the routine's can go
            routine.release_context();
            if self.config.debug_logging {
                kdebug!("routine {} finished", id);
            }
            if let Some(payload) = routine.take_panic() {
                panic::resume_unwind(payload);
            }
        }
        Ok(())
    }

    /// Suspend the running routine and return control to its resumer.
    ///
    /// Returns when some context resumes this routine again.
    ///
    /// # Panics
    ///
    /// When called from the host context.
    pub fn yield_now(&self) {
        let id = self.current.get();
        assert!(id.is_some(), "yield_now called from the host context");

        let (from, resumer) = match self.lookup(id) {
            Some(routine) => {
                routine.check_stack();
                routine.set_state(RoutineState::Suspended);
                (routine.context_ptr(), routine.resumer())
            }
            None => panic!("yield_now: running routine {} is not in the table", id),
        };

        self.current.set(resumer);
        let to = self.context_ptr(resumer);
        unsafe {
            Context::switch(from, to);
        }
    }

    /// Id of the running routine, `RoutineId::NONE` in the host context
    #[inline]
    pub fn current(&self) -> RoutineId {
        self.current.get()
    }

    /// State of a live routine, `None` if `id` is not in the table
    pub fn state(&self, id: RoutineId) -> Option<RoutineState> {
        self.lookup(id).map(|routine| routine.state())
    }

    /// Live (not destroyed) routines, finished ones included
    pub fn len(&self) -> usize {
        self.routines.borrow().iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes requested for each routine stack
    #[inline]
    pub fn stack_size(&self) -> usize {
        self.config.stack_size
    }

    #[inline]
    pub fn config(&self) -> &OrdinatorConfig {
        &self.config
    }

    /// Round-robin driver: resume every Created or Suspended routine, in
    /// id order, until all have finished. Returns the number of resumes.
    ///
    /// # Panics
    ///
    /// When called from inside a routine.
    pub fn run(&self) -> SchedResult<usize> {
        assert!(
            self.current.get().is_none(),
            "run must be called from the host context"
        );

        let mut resumes = 0;
        loop {
            let pending: Vec<RoutineId> = self
                .routines
                .borrow()
                .iter()
                .flatten()
                .filter(|routine| routine.state().is_resumable())
                .map(|routine| routine.id())
                .collect();

            if pending.is_empty() {
                return Ok(resumes);
            }

            for id in pending {
                match self.resume(id) {
                    Ok(()) => resumes += 1,
                    // Finished or destroyed by a routine earlier in this pass
                    Err(e) if e.is_exhausted() => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }

    fn lookup(&self, id: RoutineId) -> Option<Rc<Routine>> {
        if id.is_none() {
            return None;
        }
        self.routines
            .borrow()
            .get(id.slot())
            .and_then(|slot| slot.clone())
    }

    /// Saved-context slot for `id`, the host's for `RoutineId::NONE`
    fn context_ptr(&self, id: RoutineId) -> *mut Context {
        if id.is_none() {
            return self.host.get();
        }
        match self.lookup(id) {
            // Table keeps it alive: routines on the chain cannot be destroyed
            Some(routine) => routine.context_ptr(),
            None => panic!("routine {} left the table while on the resume chain", id),
        }
    }

    /// Body of every routine context, on the routine's own stack
    fn run_current(&self) -> ! {
        let id = self.current.get();
        let Some(routine) = self.lookup(id) else {
            kerror!("routine {} entered but is not in the table", id);
            process::abort();
        };

        if let Some(body) = routine.take_body() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| body(self))) {
                routine.set_panic(payload);
            }
        }

        routine.set_state(RoutineState::Finished);
        let resumer = routine.resumer();
        let from = routine.context_ptr();
        // No owned values may stay on a stack that is never returned to
        drop(routine);

        self.current.set(resumer);
        let to = self.context_ptr(resumer);
        unsafe {
            Context::switch(from, to);
        }

        kerror!("finished routine {} was switched back into", id);
        process::abort()
    }
}

impl Cooperative for Ordinator {
    #[inline]
    fn current(&self) -> RoutineId {
        Ordinator::current(self)
    }

    #[inline]
    fn yield_now(&self) {
        Ordinator::yield_now(self)
    }

    /// Resume `id` if it is waiting to run; otherwise do nothing.
    ///
    /// A Running target is already on the resume chain and will see the
    /// new state when control unwinds back to it.
    fn wake(&self, id: RoutineId) {
        match self.state(id) {
            Some(state) if state.is_resumable() => {
                if let Err(e) = self.resume(id) {
                    kwarn!("wake: routine {}: {}", id, e);
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for Ordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ordinator")
            .field("backend", &BACKEND)
            .field("current", &self.current.get())
            .field("routines", &self.len())
            .field("stack_size", &self.config.stack_size)
            .finish()
    }
}

/// Entry point of every routine context, reached from the backend trampoline
pub(crate) fn routine_main() -> ! {
    let ord = tls::active();
    if ord.is_null() {
        kerror!("routine entered with no active scheduler");
        process::abort();
    }
    // Pinned on the heap and borrowed by the resume that switched here
    let ord = unsafe { &*ord };
    ord.run_current()
}

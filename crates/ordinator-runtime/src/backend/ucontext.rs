//! Manual-stack backend on top of glibc's ucontext
//!
//! The routine's stack is a guard-protected `Stack` owned by its context.
//! `swapcontext` saves the callee state (and signal mask) of the running
//! context and loads the target in one call.

use crate::memory::Stack;
use ordinator_core::error::{SchedError, SchedResult};
use ordinator_core::traits::ExecutionContext;
use nix::errno::Errno;
use std::{mem, ptr};

/// Saved execution state plus, for routines, the stack it runs on
pub struct Context {
    /// Boxed: glibc stores a pointer into the struct itself (fpregs)
    uc: Box<libc::ucontext_t>,

    /// `None` for the host context
    stack: Option<Stack>,
}

impl Context {
    fn blank() -> Self {
        Self {
            // All-zero is a valid "not yet saved" ucontext_t
            uc: Box::new(unsafe { mem::zeroed() }),
            stack: None,
        }
    }
}

impl ExecutionContext for Context {
    fn host() -> SchedResult<Self> {
        Ok(Self::blank())
    }

    fn spawn(stack_size: usize) -> SchedResult<Self> {
        let stack = Stack::new(stack_size)?;
        let mut ctx = Self::blank();

        if unsafe { libc::getcontext(&mut *ctx.uc) } != 0 {
            return Err(SchedError::PlatformError(Errno::last() as i32));
        }

        ctx.uc.uc_stack.ss_sp = stack.bottom() as *mut libc::c_void;
        ctx.uc.uc_stack.ss_size = stack.size();
        ctx.uc.uc_stack.ss_flags = 0;
        // The trampoline always switches away explicitly
        ctx.uc.uc_link = ptr::null_mut();

        unsafe {
            libc::makecontext(&mut *ctx.uc, ucontext_entry, 0);
        }

        ctx.stack = Some(stack);
        Ok(ctx)
    }

    #[inline]
    unsafe fn switch(from: *mut Self, to: *const Self) {
        let from_uc: *mut libc::ucontext_t = &mut *(*from).uc;
        let to_uc: *const libc::ucontext_t = &*(*to).uc;
        let ret = libc::swapcontext(from_uc, to_uc);
        debug_assert_eq!(ret, 0, "swapcontext failed");
    }

    fn check_stack(&self) {
        let Some(stack) = &self.stack else {
            return;
        };
        let marker = 0u8;
        let sp = &marker as *const u8 as usize;
        assert!(
            stack.contains(sp),
            "routine stack overflow: sp {:#x} outside [{:#x}, {:#x})",
            sp,
            stack.bottom() as usize,
            stack.top() as usize,
        );
    }
}

/// First instruction of every routine context
extern "C" fn ucontext_entry() {
    crate::scheduler::routine_main()
}

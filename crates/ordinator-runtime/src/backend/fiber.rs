//! OS-fiber backend (Windows)
//!
//! The host thread is converted to a fiber by the first scheduler built
//! on it and converted back when the last one goes away; every routine
//! gets its own fiber whose stack the OS allocates and guards.
//! `SwitchToFiber` saves the running fiber implicitly, so `from` only
//! matters to the ucontext backend.

use ordinator_core::error::{MemoryError, SchedError, SchedResult};
use ordinator_core::traits::ExecutionContext;
use std::cell::Cell;
use std::ffi::c_void;
use std::ptr;
use windows_sys::Win32::Foundation::{GetLastError, ERROR_ALREADY_FIBER};
use windows_sys::Win32::System::Threading::{
    ConvertFiberToThread, ConvertThreadToFiber, CreateFiber, DeleteFiber, IsThreadAFiber,
    SwitchToFiber,
};

thread_local! {
    /// Fiber we made out of this OS thread, and how many schedulers use it
    static THREAD_FIBER: Cell<(*mut c_void, usize)> = const { Cell::new((ptr::null_mut(), 0)) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FiberKind {
    /// The converted OS thread
    Thread,
    /// A routine fiber we created and must delete
    Routine,
}

pub struct Context {
    fiber: *mut c_void,
    kind: FiberKind,
}

impl ExecutionContext for Context {
    fn host() -> SchedResult<Self> {
        let fiber = THREAD_FIBER.with(|cell| {
            let (fiber, users) = cell.get();
            if !fiber.is_null() {
                cell.set((fiber, users + 1));
                return Ok(fiber);
            }
            // Converted by foreign code: its fiber handle is not ours to reuse
            if unsafe { IsThreadAFiber() } != 0 {
                return Err(SchedError::PlatformError(ERROR_ALREADY_FIBER as i32));
            }
            let fiber = unsafe { ConvertThreadToFiber(ptr::null()) };
            if fiber.is_null() {
                return Err(SchedError::PlatformError(unsafe { GetLastError() } as i32));
            }
            cell.set((fiber, 1));
            Ok(fiber)
        })?;
        Ok(Self {
            fiber,
            kind: FiberKind::Thread,
        })
    }

    fn spawn(stack_size: usize) -> SchedResult<Self> {
        let fiber = unsafe { CreateFiber(stack_size, Some(fiber_entry), ptr::null()) };
        if fiber.is_null() {
            let code = unsafe { GetLastError() } as i32;
            return Err(MemoryError::AllocationFailed(code).into());
        }
        Ok(Self {
            fiber,
            kind: FiberKind::Routine,
        })
    }

    #[inline]
    unsafe fn switch(_from: *mut Self, to: *const Self) {
        SwitchToFiber((*to).fiber);
    }

    fn check_stack(&self) {
        // OS-owned stack with its own guard page
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        match self.kind {
            FiberKind::Routine => unsafe { DeleteFiber(self.fiber) },
            FiberKind::Thread => THREAD_FIBER.with(|cell| {
                let (fiber, users) = cell.get();
                if users > 1 {
                    cell.set((fiber, users - 1));
                } else {
                    cell.set((ptr::null_mut(), 0));
                    unsafe {
                        ConvertFiberToThread();
                    }
                }
            }),
        }
    }
}

/// First instruction of every routine fiber
unsafe extern "system" fn fiber_entry(_param: *mut c_void) {
    crate::scheduler::routine_main()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_fiber() -> bool {
        unsafe { IsThreadAFiber() != 0 }
    }

    #[test]
    fn test_hosts_share_thread_fiber() {
        let first = Context::host().unwrap();
        let second = Context::host().unwrap();
        assert_eq!(first.fiber, second.fiber);

        drop(first);
        assert!(is_fiber());
        drop(second);
        assert!(!is_fiber());
    }

    #[test]
    fn test_spawn_creates_distinct_fiber() {
        let host = Context::host().unwrap();
        let routine = Context::spawn(64 * 1024).unwrap();
        assert_ne!(host.fiber, routine.fiber);
        assert_eq!(routine.kind, FiberKind::Routine);
    }
}

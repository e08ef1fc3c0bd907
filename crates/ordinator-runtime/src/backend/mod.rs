//! Context-switch backends
//!
//! Exactly one backend is compiled in and re-exported as `Context`:
//!
//! - `ucontext` - manual mmap'd stack + `getcontext`/`makecontext`/`swapcontext` (Linux, glibc)
//! - `fiber` - OS fiber objects, `CreateFiber`/`SwitchToFiber` (Windows)
//!
//! Both implement `ExecutionContext` and enter Rust through
//! `crate::scheduler::routine_main`.

cfg_if::cfg_if! {
    if #[cfg(all(target_os = "linux", target_env = "gnu"))] {
        mod ucontext;
        pub use ucontext::Context;

        /// Name of the compiled-in backend
        pub const BACKEND: &str = "ucontext";
    } else if #[cfg(windows)] {
        mod fiber;
        pub use fiber::Context;

        /// Name of the compiled-in backend
        pub const BACKEND: &str = "fiber";
    } else {
        compile_error!("ordinator supports Linux (glibc) via ucontext and Windows via fibers");
    }
}

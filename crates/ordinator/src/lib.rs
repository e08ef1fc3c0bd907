//! # ordinator - cooperative coroutines on one OS thread
//!
//! Interleave many routines, each on its own stack, switching only at
//! explicit suspension points. Channels hand values between routines
//! without busy-waiting, and `await_blocking` pushes blocking work onto a
//! helper thread while sibling routines keep running.
//!
//! ## Features
//!
//! - **Explicit scheduler**: a pinned `Ordinator` you own, no hidden globals
//! - **Lazy stacks**: allocated on first resume, guard page below (Linux)
//! - **Two backends**: glibc ucontext on Linux, OS fibers on Windows
//! - **Nested resume**: routines may drive other routines
//! - **Channels**: single-consumer FIFO with synchronous hand-off
//!
//! ## Quick Start
//!
//! ```ignore
//! use ordinator::{Channel, Ordinator, OrdinatorConfig};
//! use std::rc::Rc;
//!
//! fn main() {
//!     let ord = Ordinator::new(OrdinatorConfig::default()).unwrap();
//!     let chan = Rc::new(Channel::new());
//!
//!     let rx = chan.clone();
//!     let consumer = ord.create(move |ord| {
//!         let sum: i32 = (0..3).map(|_| rx.pop(ord)).sum();
//!         println!("sum = {}", sum);
//!     });
//!
//!     let tx = chan.clone();
//!     let producer = ord.create(move |ord| {
//!         for v in 1..=3 {
//!             tx.push(ord, v);
//!         }
//!     });
//!
//!     ord.resume(consumer).unwrap(); // binds itself as taker, parks
//!     ord.resume(producer).unwrap(); // each push hands off to the consumer
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   host code ── create / resume / destroy ──┐
//!                                            ▼
//!   ┌────────────────────────────────────────────────────┐
//!   │ Ordinator: routine table, current id, host context │
//!   └────────────────────────────────────────────────────┘
//!        │ switch                         ▲ yield / finish
//!        ▼                                │
//!   ┌──────────┐  ┌──────────┐  ┌──────────┐
//!   │ routine 1│  │ routine 2│  │ routine n│  own stacks
//!   └──────────┘  └──────────┘  └──────────┘
//!        │ await_blocking
//!        ▼
//!   ordinator-await OS thread (polled, never touches the table)
//! ```

// Re-export core types
pub use ordinator_core::{
    RoutineId,
    RoutineState,
    Channel,
    Cooperative,
    SchedError,
    SchedResult,
    MemoryError,
    WorkerError,
};

// Re-export kprint macros for debug logging
pub use ordinator_core::{kprint, kerror, kwarn, kinfo, kdebug, ktrace};
pub use ordinator_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use ordinator_core::{env_get, env_get_bool};

// Re-export runtime types
pub use ordinator_runtime::{
    ConfigError,
    Ordinator,
    OrdinatorConfig,
    AWAIT_THREAD_NAME,
    BACKEND,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::pin::Pin;
    use std::rc::Rc;

    fn ordinator() -> Pin<Box<Ordinator>> {
        Ordinator::new(OrdinatorConfig::new().stack_size(128 * 1024)).unwrap()
    }

    #[test]
    fn test_producer_consumer_sum() {
        let ord = ordinator();
        let chan = Rc::new(Channel::<i32>::new());
        let total = Rc::new(Cell::new(0));

        let tx = chan.clone();
        let a = ord.create(move |ord| {
            for v in 1..=3 {
                tx.push(ord, v);
            }
        });

        let rx = chan.clone();
        let t = total.clone();
        let b = ord.create(move |ord| {
            for _ in 0..3 {
                t.set(t.get() + rx.pop(ord));
            }
        });

        ord.run().unwrap();
        assert_eq!(total.get(), 6);
        assert_eq!(ord.state(a), Some(RoutineState::Finished));
        assert_eq!(ord.state(b), Some(RoutineState::Finished));
        assert!(chan.is_empty());
    }

    #[test]
    fn test_consumer_first_then_producer() {
        let ord = ordinator();
        let chan = Rc::new(Channel::<i32>::new());
        let total = Rc::new(Cell::new(0));

        let rx = chan.clone();
        let t = total.clone();
        let b = ord.create(move |ord| {
            for _ in 0..3 {
                t.set(t.get() + rx.pop(ord));
            }
        });
        ord.resume(b).unwrap();
        assert_eq!(chan.taker(), b);
        assert_eq!(ord.state(b), Some(RoutineState::Suspended));

        let tx = chan.clone();
        let a = ord.create(move |ord| {
            for v in 1..=3 {
                tx.push(ord, v);
            }
        });
        ord.resume(a).unwrap();

        assert_eq!(total.get(), 6);
        assert_eq!(ord.state(a), Some(RoutineState::Finished));
        assert_eq!(ord.state(b), Some(RoutineState::Finished));
    }

    #[test]
    fn test_push_wakes_consumer_before_returning() {
        let ord = ordinator();
        let chan = Rc::new(Channel::<&'static str>::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let rx = chan.clone();
        let l = log.clone();
        let consumer = ord.create(move |ord| loop {
            let v = rx.pop(ord);
            l.borrow_mut().push(format!("got {}", v));
        });
        ord.resume(consumer).unwrap();

        let tx = chan.clone();
        let l = log.clone();
        let producer = ord.create(move |ord| {
            tx.push(ord, "x");
            l.borrow_mut().push("push returned".to_string());
        });
        ord.resume(producer).unwrap();

        assert_eq!(*log.borrow(), vec!["got x", "push returned"]);
        ord.destroy(consumer);
    }

    #[test]
    fn test_fifo_across_interleaving() {
        let ord = ordinator();
        let chan = Rc::new(Channel::<u32>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let rx = chan.clone();
        let s = seen.clone();
        let consumer = ord.create(move |ord| {
            for _ in 0..6 {
                s.borrow_mut().push(rx.pop(ord));
                // Extra suspensions between pops must not reorder values
                ord.yield_now();
            }
        });
        chan.consume(consumer);

        let tx = chan.clone();
        ord.create(move |ord| {
            for v in 0..3 {
                tx.push(ord, v);
                ord.yield_now();
            }
        });
        let tx = chan.clone();
        ord.create(move |ord| {
            for v in 3..6 {
                tx.push(ord, v);
            }
        });

        ord.run().unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 6);
        // Each producer's values arrive in its push order
        let first: Vec<u32> = seen.iter().copied().filter(|v| *v < 3).collect();
        let second: Vec<u32> = seen.iter().copied().filter(|v| *v >= 3).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![3, 4, 5]);
    }

    #[test]
    fn test_host_push_then_pop() {
        let ord = ordinator();
        let chan = Channel::new();
        chan.push(&ord, 10);
        chan.push(&ord, 20);
        assert_eq!(chan.len(), 2);
        assert_eq!(chan.pop(&ord), 10);
        assert_eq!(chan.pop(&ord), 20);
        assert!(chan.is_empty());
    }

    #[test]
    #[should_panic(expected = "from the host context")]
    fn test_host_pop_on_empty_panics() {
        let ord = ordinator();
        let chan = Channel::<u8>::new();
        chan.pop(&ord);
    }

    #[test]
    fn test_touch_resumes_taker_without_value() {
        let ord = ordinator();
        let chan = Rc::new(Channel::<u8>::new());
        let wakes = Rc::new(Cell::new(0));

        let w = wakes.clone();
        let taker = ord.create(move |ord| loop {
            w.set(w.get() + 1);
            ord.yield_now();
        });
        chan.consume(taker);

        chan.touch(&ord);
        chan.touch(&ord);
        assert_eq!(wakes.get(), 2);
        assert!(chan.is_empty());

        // Taker touching its own channel is a no-op
        let c = chan.clone();
        let self_touch = ord.create(move |ord| c.touch(ord));
        chan.consume(self_touch);
        ord.resume(self_touch).unwrap();
        assert_eq!(ord.state(self_touch), Some(RoutineState::Finished));
        ord.destroy(taker);
    }

    #[test]
    fn test_failed_hand_off_keeps_value_queued() {
        let ord = ordinator();
        let chan = Rc::new(Channel::<u32>::new());

        let gone = ord.create(|_| {});
        chan.consume(gone);
        ord.destroy(gone);

        // Wake finds no routine; push still returns and keeps the value
        chan.push(&ord, 7);
        assert_eq!(chan.len(), 1);

        let out = Rc::new(Cell::new(0));
        let rx = chan.clone();
        let o = out.clone();
        let fresh = ord.create(move |ord| o.set(rx.pop(ord)));
        chan.consume(fresh);
        ord.resume(fresh).unwrap();
        assert_eq!(out.get(), 7);
        assert!(chan.is_empty());
    }

    #[test]
    fn test_await_while_sibling_consumes() {
        let ord = ordinator();
        let chan = Rc::new(Channel::<u64>::new());
        let total = Rc::new(Cell::new(0));

        let rx = chan.clone();
        let t = total.clone();
        ord.create(move |ord| {
            for _ in 0..2 {
                t.set(t.get() + rx.pop(ord));
            }
        });

        let tx = chan.clone();
        ord.create(move |ord| {
            let heavy = ord.await_blocking(|| (1..=100u64).sum::<u64>()).unwrap();
            tx.push(ord, heavy);
            tx.push(ord, 1);
        });

        ord.run().unwrap();
        assert_eq!(total.get(), 5051);
    }
}

//! Single-consumer FIFO channel for routines
//!
//! The consumer ("taker") is a routine id, bound by the first `pop` or
//! explicitly. `push` appends and immediately resumes a parked taker, so
//! the value is usually consumed before `push` returns. `pop` yields
//! while the queue is empty.
//!
//! Not thread-safe: producer and consumer live on the same scheduler.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::id::RoutineId;
use crate::traits::Cooperative;

/// FIFO queue with a single registered consumer routine
pub struct Channel<T> {
    /// Pending values, oldest first
    queue: RefCell<VecDeque<T>>,

    /// Consumer routine; a reference, not ownership
    taker: Cell<RoutineId>,
}

impl<T> Channel<T> {
    /// Create a channel with no consumer bound
    pub fn new() -> Self {
        Self::with_taker(RoutineId::NONE)
    }

    /// Create a channel with `taker` bound as consumer up front
    pub fn with_taker(taker: RoutineId) -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            taker: Cell::new(taker),
        }
    }

    /// Rebind the consumer
    pub fn consume(&self, taker: RoutineId) {
        self.taker.set(taker);
    }

    /// Currently bound consumer (`RoutineId::NONE` when unbound)
    pub fn taker(&self) -> RoutineId {
        self.taker.get()
    }

    /// Append `value` and hand control to the consumer
    ///
    /// If a consumer is bound and it is not the caller, it is resumed
    /// before this returns (nested resume when called from a routine).
    ///
    /// The hand-off is best effort. When the consumer cannot be resumed
    /// (destroyed, already finished, or its first stack cannot be mapped)
    /// the failure is only logged by the scheduler's `wake`; the value
    /// stays queued for whoever pops next.
    pub fn push<S>(&self, sched: &S, value: T)
    where
        S: Cooperative + ?Sized,
    {
        self.queue.borrow_mut().push_back(value);
        self.touch(sched);
    }

    /// Remove the oldest value, yielding until one is available
    ///
    /// Binds the caller as consumer if none is bound yet.
    ///
    /// # Panics
    ///
    /// Panics when called from the host context on an empty channel: the
    /// host has nobody to yield to, so the value could never arrive.
    pub fn pop<S>(&self, sched: &S) -> T
    where
        S: Cooperative + ?Sized,
    {
        let me = sched.current();
        if self.taker.get().is_none() {
            self.taker.set(me);
        }

        loop {
            // Borrow ends before yielding
            let next = self.queue.borrow_mut().pop_front();
            if let Some(value) = next {
                return value;
            }
            assert!(
                me.is_some(),
                "Channel::pop on an empty channel from the host context would never complete"
            );
            sched.yield_now();
        }
    }

    /// Resume the consumer without pushing anything
    pub fn touch<S>(&self, sched: &S)
    where
        S: Cooperative + ?Sized,
    {
        let taker = self.taker.get();
        if taker.is_some() && taker != sched.current() {
            sched.wake(taker);
        }
    }

    /// Drop all pending values; the binding is kept
    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }

    /// Number of pending values
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scheduler stand-in that records wakes and never actually switches
    struct Recorder {
        current: Cell<RoutineId>,
        woken: RefCell<Vec<RoutineId>>,
        yields: Cell<usize>,
    }

    impl Recorder {
        fn at(current: u32) -> Self {
            Self {
                current: Cell::new(RoutineId::new(current)),
                woken: RefCell::new(Vec::new()),
                yields: Cell::new(0),
            }
        }
    }

    impl Cooperative for Recorder {
        fn current(&self) -> RoutineId {
            self.current.get()
        }

        fn yield_now(&self) {
            self.yields.set(self.yields.get() + 1);
        }

        fn wake(&self, id: RoutineId) {
            self.woken.borrow_mut().push(id);
        }
    }

    #[test]
    fn test_fifo_order() {
        let host = Recorder::at(0);
        let chan = Channel::new();
        for v in 1..=4 {
            chan.push(&host, v);
        }
        assert_eq!(chan.len(), 4);

        let consumer = Recorder::at(2);
        let got: Vec<i32> = (0..4).map(|_| chan.pop(&consumer)).collect();
        assert_eq!(got, vec![1, 2, 3, 4]);
        assert!(chan.is_empty());
        assert_eq!(consumer.yields.get(), 0);
    }

    #[test]
    fn test_first_pop_binds_taker() {
        let chan = Channel::new();
        chan.push(&Recorder::at(0), "a");
        assert!(chan.taker().is_none());

        assert_eq!(chan.pop(&Recorder::at(3)), "a");
        assert_eq!(chan.taker(), RoutineId::new(3));

        // Later pops by others do not steal the binding
        chan.push(&Recorder::at(0), "b");
        assert_eq!(chan.pop(&Recorder::at(4)), "b");
        assert_eq!(chan.taker(), RoutineId::new(3));
    }

    #[test]
    fn test_push_wakes_taker_unless_self() {
        let chan = Channel::with_taker(RoutineId::new(2));

        let producer = Recorder::at(1);
        chan.push(&producer, 10);
        assert_eq!(*producer.woken.borrow(), vec![RoutineId::new(2)]);

        let taker = Recorder::at(2);
        chan.push(&taker, 11);
        assert!(taker.woken.borrow().is_empty());
    }

    #[test]
    fn test_pinned_scheduler_drives_channel() {
        let chan = Channel::with_taker(RoutineId::new(4));
        let producer = Box::pin(Recorder::at(1));
        chan.push(&producer, 'z');
        assert_eq!(*producer.woken.borrow(), vec![RoutineId::new(4)]);
        assert_eq!(chan.pop(&Box::pin(Recorder::at(4))), 'z');
    }

    #[test]
    fn test_touch_and_rebind() {
        let chan: Channel<u8> = Channel::new();
        let host = Recorder::at(0);
        chan.touch(&host);
        assert!(host.woken.borrow().is_empty());

        chan.consume(RoutineId::new(9));
        chan.touch(&host);
        assert_eq!(*host.woken.borrow(), vec![RoutineId::new(9)]);
        assert!(chan.is_empty());
    }

    #[test]
    fn test_clear_keeps_binding() {
        let chan = Channel::with_taker(RoutineId::new(5));
        let host = Recorder::at(0);
        chan.push(&host, 1);
        chan.push(&host, 2);
        chan.clear();
        assert_eq!(chan.len(), 0);
        assert_eq!(chan.taker(), RoutineId::new(5));
    }

    #[test]
    #[should_panic(expected = "from the host context")]
    fn test_host_pop_on_empty_panics() {
        let chan: Channel<i32> = Channel::new();
        chan.pop(&Recorder::at(0));
    }
}

//! Blocking-call bridge example
//!
//! One routine waits on slow blocking work through `await_blocking` while
//! a sibling keeps ticking on the same OS thread.

use ordinator::{kinfo, Ordinator, OrdinatorConfig, SchedError};
use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

fn slow_fib(n: u64) -> u64 {
    if n < 2 {
        n
    } else {
        slow_fib(n - 1) + slow_fib(n - 2)
    }
}

fn main() -> Result<(), SchedError> {
    println!("=== Ordinator Bridge Example ===\n");

    let ord = Ordinator::new(OrdinatorConfig::default())?;
    let ticks = Rc::new(Cell::new(0u64));
    let start = Instant::now();

    ord.create(|ord| {
        let result = ord.await_blocking(|| slow_fib(32));
        match result {
            Ok(v) => println!("[Waiter] fib(32) = {}", v),
            Err(e) => println!("[Waiter] bridge failed: {}", e),
        }

        let slept = ord.await_blocking(|| {
            thread::sleep(Duration::from_millis(100));
            "slept 100ms"
        });
        if let Ok(msg) = slept {
            println!("[Waiter] {}", msg);
        }
    });

    let t = ticks.clone();
    ord.create(move |ord| {
        for _ in 0..1000 {
            t.set(t.get() + 1);
            ord.yield_now();
        }
    });

    let resumes = ord.run()?;
    kinfo!("drive loop done: {} resumes", resumes);

    println!(
        "\nSibling ticks: {}, elapsed: {:?}",
        ticks.get(),
        start.elapsed()
    );

    // From the host the bridge spins instead of yielding
    let answer = ord.await_blocking(|| 40 + 2)?;
    println!("Host await: {}", answer);

    println!("\n=== Example Complete ===");
    Ok(())
}

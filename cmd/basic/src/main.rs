//! Basic Ordinator example
//!
//! Creates a few routines, drives them round-robin from the host, and
//! shows a routine resuming another one.
//!
//! # Environment Variables
//!
//! - `ORD_FLUSH_EPRINT=1` - Flush debug output immediately (useful for crash debugging)
//! - `ORD_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)
//! - `ORD_STACK_SIZE=65536` - Per-routine stack size in bytes

use ordinator::{kdebug, kerror, kinfo, Ordinator, OrdinatorConfig, RoutineId, BACKEND};
use std::cell::Cell;
use std::rc::Rc;

// ORD_LOG_LEVEL=debug ORD_FLUSH_EPRINT=1 cargo run -p ordinator-basic
fn main() {
    println!("=== Ordinator Basic Example ===\n");

    let config = OrdinatorConfig::default().debug_logging(true);
    config.print();

    let ord = match Ordinator::new(config) {
        Ok(ord) => ord,
        Err(e) => {
            kerror!("cannot start scheduler: {}", e);
            std::process::exit(1);
        }
    };
    println!("Backend: {}\n", BACKEND);

    let completed = Rc::new(Cell::new(0));

    for i in 1..=3 {
        let c = completed.clone();
        let id = ord.create(move |ord| {
            kdebug!("[routine {}] started", i);
            for j in 0..3 {
                kdebug!("[routine {}] iteration {}", i, j);
                ord.yield_now();
            }
            kdebug!("[routine {}] finished", i);
            c.set(c.get() + 1);
        });
        println!("Created routine {} (ID={})", i, id);
    }

    // A driver routine that resumes a child of its own
    let c = completed.clone();
    let driver = ord.create(move |ord| {
        let child = ord.create(|ord| {
            kdebug!("[child] first half");
            ord.yield_now();
            kdebug!("[child] second half");
        });
        while ord.resume(child).is_ok() {
            kdebug!("[driver] child {} is {:?}", child, ord.state(child));
        }
        ord.destroy(child);
        c.set(c.get() + 1);
    });
    println!("Created driver routine (ID={})", driver);

    match ord.run() {
        Ok(resumes) => kinfo!("{} routine(s) completed after {} resumes", completed.get(), resumes),
        Err(e) => kerror!("drive loop stopped: {}", e),
    }

    // Finished routines keep their ids until destroyed
    let finished: Vec<RoutineId> = (1..=ord.len() as u32 + 1)
        .map(RoutineId::new)
        .filter(|id| ord.state(*id).map_or(false, |s| s.is_finished()))
        .collect();
    for id in finished {
        ord.destroy(id);
    }
    println!("Routines left after cleanup: {}", ord.len());

    println!("\n=== Example Complete ===");
}

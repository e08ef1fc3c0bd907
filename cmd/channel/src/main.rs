//! Channel communication example
//!
//! A consumer routine parks inside `pop`; every `push` from the producer
//! resumes it before the push returns.

use ordinator::{Channel, Ordinator, OrdinatorConfig};
use std::cell::Cell;
use std::rc::Rc;

fn main() {
    println!("=== Ordinator Channel Example ===\n");

    let ord = match Ordinator::new(OrdinatorConfig::default()) {
        Ok(ord) => ord,
        Err(e) => {
            eprintln!("cannot start scheduler: {}", e);
            std::process::exit(1);
        }
    };

    let chan = Rc::new(Channel::<i32>::new());
    let total = Rc::new(Cell::new(0));

    // Consumer
    let rx = chan.clone();
    let t = total.clone();
    let consumer = ord.create(move |ord| {
        println!("[Consumer] Starting...");
        for _ in 0..5 {
            let val = rx.pop(ord);
            println!("[Consumer] Received: {}", val);
            t.set(t.get() + val);
        }
        println!("[Consumer] Done!");
    });

    // Producer
    let tx = chan.clone();
    let producer = ord.create(move |ord| {
        println!("[Producer] Starting...");
        for i in 1..=5 {
            println!("[Producer] Sending: {}", i);
            tx.push(ord, i);
        }
        println!("[Producer] Done!");
    });

    // Consumer first so it binds itself as taker and parks
    for id in [consumer, producer] {
        if let Err(e) = ord.resume(id) {
            eprintln!("resume {}: {}", id, e);
        }
    }

    println!("\nSum received: {} (pending: {})", total.get(), chan.len());
    println!("\n=== Example Complete ===");
}

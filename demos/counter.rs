//! Counter Store
//!
//! This example demonstrates the smallest useful store.
//!
//! Key concepts:
//! - A reducer computes the next state from the previous state and an action
//! - Dispatch is the only way to change state
//! - Listeners run after every dispatch
//!
//! Run with: cargo run --example counter

use statecell::core::Action;
use statecell::store::{create_store, reducer};

fn main() {
    println!("=== Counter Store Example ===\n");

    let counter = reducer(|state: Option<i64>, action: &Action| {
        let count = state.unwrap_or(0);
        match action.kind() {
            Some("INCREMENT") => count + 1,
            Some("DECREMENT") => count - 1,
            _ => count,
        }
    });

    let store = create_store(counter, None).unwrap();
    println!("Initial state: {}", store.get_state().unwrap());

    let reader = store.clone();
    let subscription = store
        .subscribe(move || {
            println!("  listener: count is now {}", reader.get_state().unwrap());
        })
        .unwrap();

    for kind in ["INCREMENT", "INCREMENT", "DECREMENT", "INCREMENT"] {
        println!("Dispatching {kind}");
        store.dispatch(Action::new(kind)).unwrap();
    }

    subscription.unsubscribe().unwrap();
    store.dispatch(Action::new("INCREMENT")).unwrap();
    println!("\nAfter unsubscribing, one more increment: {}", store.get_state().unwrap());

    println!("\n=== Example Complete ===");
}

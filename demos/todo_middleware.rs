//! Todo List with Middleware
//!
//! This example demonstrates combined reducers and a middleware chain.
//!
//! Key concepts:
//! - Each slice reducer owns one key of the combined state
//! - Middleware wraps dispatch, outermost first
//! - A middleware can swallow actions before they reach the reducer
//! - `LoggerMiddleware` reports through whatever `log` backend is installed
//!
//! Run with: cargo run --example todo_middleware

use log::{Level, LevelFilter};
use statecell::combine::{combine_reducers, CombinedState};
use statecell::core::Action;
use statecell::middleware::{apply_middleware, middleware, LoggerMiddleware, Middleware};
use statecell::store::{InteropObservable, StoreBuilder};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Todo {
    text: String,
    done: bool,
}

fn todos(state: Option<Arc<Vec<Todo>>>, action: &Action) -> Option<Arc<Vec<Todo>>> {
    let todos = state.unwrap_or_default();
    match action.kind() {
        Some("ADD_TODO") => {
            let text = action.payload().and_then(|text| text.as_str()).unwrap_or_default();
            let mut next = (*todos).clone();
            next.push(Todo {
                text: text.to_string(),
                done: false,
            });
            Some(Arc::new(next))
        }
        Some("TOGGLE_TODO") => {
            let index = action.payload().and_then(|index| index.as_u64());
            match index.map(|index| index as usize) {
                Some(index) if index < todos.len() => {
                    let mut next = (*todos).clone();
                    next[index].done = !next[index].done;
                    Some(Arc::new(next))
                }
                _ => Some(todos),
            }
        }
        _ => Some(todos),
    }
}

fn filter(state: Option<Arc<String>>, action: &Action) -> Option<Arc<String>> {
    match (action.kind(), action.payload().and_then(|filter| filter.as_str())) {
        (Some("SET_FILTER"), Some(filter)) => Some(Arc::new(filter.to_string())),
        _ => state.or_else(|| Some(Arc::new("all".to_string()))),
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .init();

    println!("=== Todo List with Middleware Example ===\n");

    let root = combine_reducers()
        .slice("todos", todos)
        .slice("filter", filter)
        .build();

    let no_empty_todos = middleware(|_api, next, action: Action| {
        let empty = action.is("ADD_TODO")
            && action
                .payload()
                .and_then(|text| text.as_str())
                .map_or(true, |text| text.trim().is_empty());
        if empty {
            println!("  (ignoring empty todo)");
            return Ok(action);
        }
        next(action)
    });
    let logger: Arc<dyn Middleware<CombinedState>> = Arc::new(
        LoggerMiddleware::builder()
            .level(Level::Info)
            .log_state(false)
            .build(),
    );

    let store = StoreBuilder::new(root.into_reducer())
        .enhancer(apply_middleware(vec![logger, no_empty_todos]))
        .build()
        .unwrap();

    store
        .observable()
        .subscribe(|state: &CombinedState| {
            let todos = state.get::<Vec<Todo>>("todos").unwrap_or_default();
            let open = todos.iter().filter(|todo| !todo.done).count();
            println!("  observer: {} todos, {open} open", todos.len());
        })
        .unwrap();

    store
        .dispatch(Action::new("ADD_TODO").with_payload("Write the docs"))
        .unwrap();
    store.dispatch(Action::new("ADD_TODO").with_payload("   ")).unwrap();
    store
        .dispatch(Action::new("ADD_TODO").with_payload("Release 0.1"))
        .unwrap();
    store.dispatch(Action::new("TOGGLE_TODO").with_payload(0)).unwrap();
    store
        .dispatch(Action::new("SET_FILTER").with_payload("open"))
        .unwrap();

    let state = store.get_state().unwrap();
    println!("\nFinal state: {state:?}");
    for todo in state.get::<Vec<Todo>>("todos").unwrap_or_default().iter() {
        let mark = if todo.done { "x" } else { " " };
        println!("  [{mark}] {}", todo.text);
    }

    println!("\n=== Example Complete ===");
}

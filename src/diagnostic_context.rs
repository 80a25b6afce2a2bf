//! Per-thread mapped diagnostic context.
//!
//! Callers attach key/value pairs (for example the `user-agent` of the request
//! being served) to the current thread. The `log` bridge copies the context
//! into every event it creates on that thread.

use std::cell::RefCell;
use std::collections::BTreeMap;

thread_local! {
    static CONTEXT: RefCell<BTreeMap<String, String>> = const { RefCell::new(BTreeMap::new()) };
}

/// Set `key` to `value` for the current thread, returning the previous value.
pub fn insert(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow_mut().insert(key.into(), value.into()))
}

pub fn get(key: &str) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow().get(key).cloned())
}

/// Remove `key` from the current thread's context.
pub fn remove(key: &str) -> Option<String> {
    CONTEXT.with(|ctx| ctx.borrow_mut().remove(key))
}

pub fn clear() {
    CONTEXT.with(|ctx| ctx.borrow_mut().clear());
}

/// Copy of the current thread's context.
pub fn snapshot() -> BTreeMap<String, String> {
    CONTEXT.with(|ctx| ctx.borrow().clone())
}

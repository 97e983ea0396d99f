#![forbid(unsafe_code)]

//! A minimal reducer-driven store.
//!
//! [`ReducerStore`] holds one snapshot and replaces it wholesale on every
//! [`dispatch`](ReducerStore::dispatch). Snapshots are cloned out of the store,
//! so state types are expected to be cheap to clone (`Copy` scalars or an
//! `Rc` around the real state).
//!
//! # Invariants
//!
//! 1. Listeners are notified in registration order after every dispatch,
//!    whether or not the reducer produced a different value.
//! 2. The listener list is snapshotted before notification. A listener
//!    registered during a notification is first called on the next one.
//! 3. No borrow is held while a listener runs, so a listener may dispatch.
//!    The nested dispatch notifies every listener recursively before the
//!    outer notification continues.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::store::{Listener, Store};

type Reducer<S, A> = Box<dyn Fn(&S, A) -> S>;

pub struct ReducerStore<S, A> {
    state: RefCell<S>,
    reducer: Reducer<S, A>,
    listeners: RefCell<Vec<Listener>>,
}

impl<S: Clone, A> ReducerStore<S, A> {
    /// Create a store with an initial snapshot and a reducer.
    pub fn new(initial: S, reducer: impl Fn(&S, A) -> S + 'static) -> Self {
        Self {
            state: RefCell::new(initial),
            reducer: Box::new(reducer),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Apply `action` to the current snapshot and notify listeners.
    pub fn dispatch(&self, action: A) {
        let next = {
            let current = self.state.borrow();
            (self.reducer)(&current, action)
        };
        self.replace_state(next);
    }

    /// Install `state` as the current snapshot and notify listeners.
    pub fn replace_state(&self, state: S) {
        *self.state.borrow_mut() = state;
        self.notify();
    }

    /// Call every registered listener without changing state.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in &listeners {
            listener();
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<S: Clone, A> Store for ReducerStore<S, A> {
    type State = S;

    fn get_state(&self) -> S {
        self.state.borrow().clone()
    }

    fn subscribe(&self, listener: Listener) {
        self.listeners.borrow_mut().push(listener);
    }
}

impl<S: fmt::Debug, A> fmt::Debug for ReducerStore<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducerStore")
            .field("state", &self.state.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

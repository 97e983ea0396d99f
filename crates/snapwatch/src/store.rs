#![forbid(unsafe_code)]

//! The store contract consumed by the binder.
//!
//! A store hands out immutable snapshots via [`Store::get_state`] and
//! accepts listeners via [`Store::subscribe`], calling each one with no
//! arguments after every state transition. Typed implementations satisfy
//! the contract at compile time. [`PartsStore`] is the escape hatch for
//! stores assembled from optional closures; its shape is checked at bind.

use std::fmt;
use std::rc::Rc;

/// Callback registered with a store, invoked after each state transition.
pub type Listener = Rc<dyn Fn()>;

/// An immutable-snapshot state container.
pub trait Store {
    /// Snapshot type handed to selectors.
    type State;

    /// Current snapshot.
    fn get_state(&self) -> Self::State;

    /// Register a listener for state transitions.
    fn subscribe(&self, listener: Listener);

    /// Whether both `get_state` and `subscribe` are actually available.
    ///
    /// Typed stores always are. Override only for stores built from parts.
    fn implements_interface(&self) -> bool {
        true
    }
}

/// A store assembled from optional `get_state` / `subscribe` closures.
///
/// Binding fails with [`BindError::InvalidStore`](crate::BindError::InvalidStore)
/// unless both parts are present.
pub struct PartsStore<S> {
    get_state: Option<Box<dyn Fn() -> S>>,
    subscribe: Option<Box<dyn Fn(Listener)>>,
}

impl<S> PartsStore<S> {
    /// A store with no parts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            get_state: None,
            subscribe: None,
        }
    }

    #[must_use]
    pub fn with_get_state(mut self, get_state: impl Fn() -> S + 'static) -> Self {
        self.get_state = Some(Box::new(get_state));
        self
    }

    #[must_use]
    pub fn with_subscribe(mut self, subscribe: impl Fn(Listener) + 'static) -> Self {
        self.subscribe = Some(Box::new(subscribe));
        self
    }
}

impl<S> Default for PartsStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Store for PartsStore<S> {
    type State = S;

    /// # Panics
    ///
    /// Panics if the `get_state` part is missing. The binder checks
    /// [`implements_interface`](Store::implements_interface) first.
    fn get_state(&self) -> S {
        let get_state = self
            .get_state
            .as_ref()
            .expect("get_state part is checked before binding");
        get_state()
    }

    fn subscribe(&self, listener: Listener) {
        if let Some(subscribe) = &self.subscribe {
            subscribe(listener);
        }
    }

    fn implements_interface(&self) -> bool {
        self.get_state.is_some() && self.subscribe.is_some()
    }
}

impl<S> fmt::Debug for PartsStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartsStore")
            .field("get_state", &self.get_state.is_some())
            .field("subscribe", &self.subscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn complete_parts_implement_interface() {
        let store = PartsStore::new()
            .with_get_state(|| 5u32)
            .with_subscribe(|_| {});
        assert!(store.implements_interface());
        assert_eq!(store.get_state(), 5);
    }

    #[test]
    fn missing_parts_fail_interface_check() {
        assert!(!PartsStore::<u32>::new().implements_interface());
        assert!(!PartsStore::new().with_get_state(|| 1u32).implements_interface());
        assert!(!PartsStore::<u32>::new().with_subscribe(|_| {}).implements_interface());
    }

    #[test]
    fn subscribe_forwards_listener() {
        let registered: Rc<RefCell<Vec<Listener>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&registered);
        let store = PartsStore::new()
            .with_get_state(|| 0u8)
            .with_subscribe(move |listener| sink.borrow_mut().push(listener));

        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        store.subscribe(Rc::new(move || *counter.borrow_mut() += 1));

        assert_eq!(registered.borrow().len(), 1);
        (registered.borrow()[0])();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn debug_reports_parts() {
        let store = PartsStore::new().with_get_state(|| 1u32);
        let dbg = format!("{store:?}");
        assert!(dbg.contains("get_state: true"));
        assert!(dbg.contains("subscribe: false"));
    }
}

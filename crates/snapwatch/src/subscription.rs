#![forbid(unsafe_code)]

//! Subscription descriptors: a selector paired with a change handler.
//!
//! A [`Subscription`] is built once by the caller, shared as an `Rc`, and
//! handed to an [`Aggregator`](crate::Aggregator). The engine only ever calls
//! the two functions; it never clones or mutates the descriptor.
//!
//! [`Subscription::new`] always supplies both capabilities. Descriptors
//! assembled piecewise with [`Subscription::empty`] may lack one, which is
//! reported at bind time.

use std::fmt;
use std::rc::Rc;

/// Maps a state snapshot to a derived value.
pub type Selector<S, V> = Box<dyn Fn(&S) -> V>;

/// Receives `(new, previous)` when a selector result changes.
pub type ChangeHandler<V> = Box<dyn Fn(&V, &V)>;

/// A selector and the handler to call when its result changes.
pub struct Subscription<S, V> {
    selector: Option<Selector<S, V>>,
    on_change: Option<ChangeHandler<V>>,
}

impl<S, V> Subscription<S, V> {
    /// Create a descriptor with both capabilities.
    pub fn new(
        selector: impl Fn(&S) -> V + 'static,
        on_change: impl Fn(&V, &V) + 'static,
    ) -> Self {
        Self {
            selector: Some(Box::new(selector)),
            on_change: Some(Box::new(on_change)),
        }
    }

    /// Create a descriptor with neither capability set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            selector: None,
            on_change: None,
        }
    }

    /// Set the selector.
    #[must_use]
    pub fn selector(mut self, selector: impl Fn(&S) -> V + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Set the change handler.
    #[must_use]
    pub fn on_change(mut self, on_change: impl Fn(&V, &V) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    #[must_use]
    pub fn has_selector(&self) -> bool {
        self.selector.is_some()
    }

    #[must_use]
    pub fn has_on_change(&self) -> bool {
        self.on_change.is_some()
    }

    /// Wrap in an `Rc` for registration with an aggregator.
    #[must_use]
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Run the selector, if present.
    pub(crate) fn select(&self, snapshot: &S) -> Option<V> {
        self.selector.as_ref().map(|select| select(snapshot))
    }

    /// Run the change handler, if present.
    pub(crate) fn notify_change(&self, new: &V, previous: &V) {
        if let Some(on_change) = &self.on_change {
            on_change(new, previous);
        }
    }
}

impl<S, V> fmt::Debug for Subscription<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("selector", &self.has_selector())
            .field("on_change", &self.has_on_change())
            .finish()
    }
}

#![forbid(unsafe_code)]

//! Subscription aggregation and change detection.
//!
//! An [`Aggregator`] collects subscription descriptors and does nothing else
//! until [`bind`](Aggregator::bind) is called with a store. Binding:
//!
//! 1. rejects an empty descriptor list, a missing store, and a store whose
//!    interface is incomplete, in that order;
//! 2. reads one snapshot and, descriptor by descriptor, validates the
//!    descriptor (selector, then handler) and runs its selector once to seed
//!    its slot;
//! 3. registers exactly one listener with the store.
//!
//! Each time the listener fires, a fresh snapshot is read, every selector is
//! re-run in order, and a handler is called with `(new, previous)` only when
//! its selector result is not [identical](crate::Identity) to the slot.
//!
//! # Invariants
//!
//! 1. Slot count equals descriptor count for the lifetime of a binding.
//! 2. Handlers never run during binding.
//! 3. Every selector runs once per notification, whatever the other slots do.
//! 4. A slot is overwritten only after its handler returns.
//!
//! # Failure Modes
//!
//! - **Invalid input**: `bind` returns a [`BindError`] before registering a
//!   listener. Selectors of descriptors before the failing one have already
//!   run once.
//! - **Store dropped**: the listener holds the store weakly; notifications
//!   delivered after the last strong reference is gone are ignored.
//! - **Re-entrant updates**: a handler that dispatches to the store causes a
//!   nested notification pass over the same slots. No borrow is held across
//!   user code, so this recurses instead of panicking.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{BindError, Result};
use crate::identity::Identity;
use crate::store::Store;
use crate::subscription::Subscription;

const DEFAULT_LABEL: &str = "aggregate";

/// A registered descriptor with its value type erased.
trait Entry<S> {
    /// Validate the descriptor at `index` and seed a slot from `snapshot`.
    fn open(&self, index: usize, snapshot: &S) -> Result<Box<dyn Tracked<S>>>;
}

/// One slot of a binding session.
trait Tracked<S> {
    /// Re-run the selector; returns whether the handler fired.
    fn refresh(&self, snapshot: &S) -> bool;
}

struct Descriptor<S, V> {
    subscription: Rc<Subscription<S, V>>,
}

impl<S: 'static, V: Identity + Clone + 'static> Entry<S> for Descriptor<S, V> {
    fn open(&self, index: usize, snapshot: &S) -> Result<Box<dyn Tracked<S>>> {
        if !self.subscription.has_selector() {
            return Err(BindError::MissingSelector { index });
        }
        if !self.subscription.has_on_change() {
            return Err(BindError::MissingOnChange { index });
        }
        let initial = self
            .subscription
            .select(snapshot)
            .ok_or(BindError::MissingSelector { index })?;
        Ok(Box::new(Slot {
            subscription: Rc::clone(&self.subscription),
            last: RefCell::new(initial),
        }))
    }
}

struct Slot<S, V> {
    subscription: Rc<Subscription<S, V>>,
    last: RefCell<V>,
}

impl<S, V: Identity + Clone> Tracked<S> for Slot<S, V> {
    fn refresh(&self, snapshot: &S) -> bool {
        let Some(next) = self.subscription.select(snapshot) else {
            return false;
        };
        if self.last.borrow().is_identical(&next) {
            return false;
        }
        let previous = self.last.borrow().clone();
        self.subscription.notify_change(&next, &previous);
        *self.last.borrow_mut() = next;
        true
    }
}

/// Per-bind state: the ordered slots and a notification counter.
struct Session<S> {
    label: Cow<'static, str>,
    slots: Vec<Box<dyn Tracked<S>>>,
    notifications: Cell<u64>,
}

impl<S> Session<S> {
    /// Evaluate every slot against `snapshot`. Returns how many changed.
    fn process(&self, snapshot: &S) -> usize {
        self.notifications.set(self.notifications.get() + 1);

        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!(
            "snapwatch.notify",
            label = %self.label,
            slots = self.slots.len(),
            changed = tracing::field::Empty
        );
        #[cfg(feature = "tracing")]
        let _guard = span.enter();

        let mut changed = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.refresh(snapshot) {
                changed += 1;
                #[cfg(feature = "tracing")]
                tracing::trace!(index, "selector result changed");
                #[cfg(not(feature = "tracing"))]
                let _ = index;
            }
        }

        #[cfg(feature = "tracing")]
        span.record("changed", changed);
        changed
    }
}

/// Collects subscriptions and binds them to a store.
///
/// Descriptors may have different value types; they only have to share the
/// snapshot type `S`.
pub struct Aggregator<S> {
    label: Cow<'static, str>,
    entries: Vec<Box<dyn Entry<S>>>,
}

impl<S: 'static> Aggregator<S> {
    /// An aggregator with no descriptors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            label: Cow::Borrowed(DEFAULT_LABEL),
            entries: Vec::new(),
        }
    }

    /// Name used in log fields and `Debug` output.
    #[must_use]
    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a descriptor. Adding the same descriptor twice gives it two slots.
    #[must_use]
    pub fn with<V>(mut self, subscription: &Rc<Subscription<S, V>>) -> Self
    where
        V: Identity + Clone + 'static,
    {
        self.push(subscription);
        self
    }

    /// Add a descriptor in place.
    pub fn push<V>(&mut self, subscription: &Rc<Subscription<S, V>>)
    where
        V: Identity + Clone + 'static,
    {
        self.entries.push(Box::new(Descriptor {
            subscription: Rc::clone(subscription),
        }));
    }

    /// Number of registered descriptors (including repeats).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate, seed one slot per descriptor, and register a listener.
    ///
    /// Each call starts an independent session with its own slots.
    ///
    /// # Errors
    ///
    /// - [`BindError::NoSubscribers`] if no descriptors were added.
    /// - [`BindError::MissingStore`] if `store` is `None`.
    /// - [`BindError::InvalidStore`] if the store's interface is incomplete.
    /// - [`BindError::MissingSelector`] / [`BindError::MissingOnChange`] for
    ///   the first incomplete descriptor.
    pub fn bind<St>(&self, store: Option<&Rc<St>>) -> Result<Binding<S>>
    where
        St: Store<State = S> + 'static,
    {
        if self.entries.is_empty() {
            return Err(BindError::NoSubscribers);
        }
        let store = store.ok_or(BindError::MissingStore)?;
        if !store.implements_interface() {
            return Err(BindError::InvalidStore);
        }

        let snapshot = store.get_state();
        let mut slots = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            slots.push(entry.open(index, &snapshot)?);
        }

        let session = Rc::new(Session {
            label: self.label.clone(),
            slots,
            notifications: Cell::new(0),
        });

        let weak_store = Rc::downgrade(store);
        let listener_session = Rc::clone(&session);
        store.subscribe(Rc::new(move || {
            let Some(store) = weak_store.upgrade() else {
                tracing::debug!(
                    label = %listener_session.label,
                    "notification after store was dropped; ignoring"
                );
                return;
            };
            let snapshot = store.get_state();
            listener_session.process(&snapshot);
        }));

        tracing::debug!(
            label = %session.label,
            slots = session.slots.len(),
            "bound subscriptions to store"
        );

        Ok(Binding { session })
    }
}

impl<S: 'static> Default for Aggregator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Aggregator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("label", &self.label)
            .field("descriptors", &self.entries.len())
            .finish()
    }
}

/// Build an aggregator from descriptors sharing one value type.
pub fn aggregate<'a, S, V, I>(subscriptions: I) -> Aggregator<S>
where
    S: 'static,
    V: Identity + Clone + 'static,
    I: IntoIterator<Item = &'a Rc<Subscription<S, V>>>,
{
    let mut aggregator = Aggregator::new();
    for subscription in subscriptions {
        aggregator.push(subscription);
    }
    aggregator
}

/// Build an aggregator from descriptors of any value types.
///
/// Each argument is an `Rc<Subscription<S, _>>` expression.
///
/// ```
/// use snapwatch::{aggregate, Subscription};
///
/// let count = Subscription::new(|s: &u32| *s, |_, _| {}).shared();
/// let parity = Subscription::new(|s: &u32| s % 2 == 0, |_, _| {}).shared();
/// let binder = aggregate![count, parity, count];
/// assert_eq!(binder.len(), 3);
/// ```
#[macro_export]
macro_rules! aggregate {
    () => {
        $crate::Aggregator::new()
    };
    ($($subscription:expr),+ $(,)?) => {
        $crate::Aggregator::new()$(.with(&$subscription))+
    };
}

/// Handle to a live binding.
///
/// Dropping the handle does not detach the listener; the store owns it.
pub struct Binding<S> {
    session: Rc<Session<S>>,
}

impl<S> Binding<S> {
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.session.slots.len()
    }

    /// Store notifications processed so far, nested ones included.
    #[must_use]
    pub fn notifications(&self) -> u64 {
        self.session.notifications.get()
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.session.label
    }
}

impl<S> fmt::Debug for Binding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("label", &self.session.label)
            .field("slots", &self.session.slots.len())
            .field("notifications", &self.session.notifications.get())
            .finish()
    }
}

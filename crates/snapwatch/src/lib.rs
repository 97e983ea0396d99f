#![forbid(unsafe_code)]

//! Selector subscriptions over immutable-snapshot state stores.
//!
//! `snapwatch` lets code observe values derived from a store's state without
//! listening to raw change events. Each [`Subscription`] pairs a selector with
//! a change handler; an [`Aggregator`] binds a set of them to a [`Store`] and
//! calls a handler only when its selector result changes.
//!
//! Change detection uses [`Identity`]: scalars and strings by value, `Rc` /
//! `Arc` by address. There is no deep comparison.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use snapwatch::{aggregate, ReducerStore, Subscription};
//!
//! let store = Rc::new(ReducerStore::new(1u32, |state, delta: u32| state + delta));
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&seen);
//! let value = Subscription::new(|s: &u32| *s, move |new, old| {
//!     log.borrow_mut().push((*new, *old));
//! })
//! .shared();
//!
//! let binding = aggregate![value].bind(Some(&store))?;
//! assert_eq!(binding.slot_count(), 1);
//!
//! store.dispatch(1);
//! assert_eq!(*seen.borrow(), vec![(2, 1)]);
//! # Ok::<(), snapwatch::BindError>(())
//! ```

pub mod aggregate;
pub mod error;
pub mod identity;
pub mod reducer;
pub mod store;
pub mod subscription;

pub use aggregate::{Aggregator, Binding, aggregate};
pub use error::{BindError, Result};
pub use identity::Identity;
pub use reducer::ReducerStore;
pub use store::{Listener, PartsStore, Store};
pub use subscription::{ChangeHandler, Selector, Subscription};

#![forbid(unsafe_code)]

//! Strict identity comparison for selector results.
//!
//! Change detection is shallow. Scalars and strings compare by value, shared
//! pointers compare by address. Two `Rc`s holding structurally equal data
//! are still different values, which is what lets a selector that rebuilds
//! an object on every call report a change every time.
//!
//! # Invariants
//!
//! 1. `is_identical` never inspects the contents behind a shared pointer.
//! 2. Floats follow IEEE `==`: `NaN` is never identical to itself and
//!    `0.0` is identical to `-0.0`.
//!
//! Collections (`Vec`, maps) intentionally have no impl. Wrap them in `Rc`
//! to observe them by reference.

use std::rc::Rc;
use std::sync::Arc;

/// Identity relation used to decide whether a selector result changed.
pub trait Identity {
    /// Whether `self` and `other` are the same value.
    fn is_identical(&self, other: &Self) -> bool;
}

macro_rules! impl_identity_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identity for $ty {
                #[inline]
                fn is_identical(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_identity_by_value!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &'static str,
    Box<str>,
);

impl<T: ?Sized> Identity for Rc<T> {
    #[inline]
    fn is_identical(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    #[inline]
    fn is_identical(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.is_identical(b),
            _ => false,
        }
    }
}

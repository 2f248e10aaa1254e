//! Identity-keyed memoization for selectors.
//!
//! DESIGN
//! ======
//! A `Memoized` keeps the last input and output. It recomputes only when the
//! new input is a different reference (`Arc::ptr_eq`), never by comparing
//! contents. The cached input is held, so a freed allocation can never be
//! mistaken for the cached one.

#[cfg(test)]
#[path = "memo_test.rs"]
mod memo_test;

use std::sync::{Arc, Mutex, PoisonError};

/// Reference identity comparison.
pub trait SameRef {
    fn same_ref(&self, other: &Self) -> bool;
}

impl<T: ?Sized> SameRef for Arc<T> {
    fn same_ref(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: SameRef> SameRef for Option<T> {
    fn same_ref(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_ref(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<A: SameRef, B: SameRef> SameRef for (A, B) {
    fn same_ref(&self, other: &Self) -> bool {
        self.0.same_ref(&other.0) && self.1.same_ref(&other.1)
    }
}

type Compute<I, O> = Box<dyn Fn(&I) -> O + Send + Sync>;

/// Single-entry cache in front of a pure function.
pub struct Memoized<I, O> {
    compute: Compute<I, O>,
    last: Mutex<Option<(I, O)>>,
}

impl<I, O> Memoized<I, O>
where
    I: SameRef,
    O: Clone,
{
    pub fn new(compute: impl Fn(&I) -> O + Send + Sync + 'static) -> Self {
        Self { compute: Box::new(compute), last: Mutex::new(None) }
    }

    /// Return the cached output for `input`, recomputing on a new reference.
    pub fn get(&self, input: I) -> O {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((prev, out)) = last.as_ref() {
            if prev.same_ref(&input) {
                return out.clone();
            }
        }
        let out = (self.compute)(&input);
        *last = Some((input, out.clone()));
        out
    }
}

//! Abstract operations performed against a data source.

use std::marker::PhantomData;

/// Operation to create a new entry.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation to modify an existing entry.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation to remove an entry.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Operation to read an entry (or a set of them).
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Selector of `W` by `B`.
///
/// `W` only describes the shape of the result, so the same `B` may be used to
/// select different things (e.g. a single entry or a whole page of them).
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] with the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns a reference to the inner value.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.by
    }

    /// Consumes this [`By`] and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}

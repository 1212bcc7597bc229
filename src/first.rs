//! Cache for the first element a sequence ever pulls.
//!
//! The first element is special: it can be read any number of times through
//! [`Sequence::first`](crate::Sequence::first) and is also delivered exactly
//! once through the ordinary traversal. [`FirstValue`] tracks both facts:
//!
//! - `taken`: the element has been pulled from the source
//! - `sent`: the element has been handed to a traversal consumer
//!
//! `taken` always precedes or coincides with `sent`.

use std::mem;

pub(crate) enum FirstValue<T> {
    /// Nothing pulled yet.
    Fresh,
    /// Pulled by a peek, not yet delivered. `None` when the source was empty.
    Unsent(Option<T>),
    /// Delivered to the traversal; kept for later peeks.
    Sent(Option<T>),
}

impl<T> FirstValue<T> {
    pub(crate) fn is_taken(&self) -> bool {
        !matches!(self, FirstValue::Fresh)
    }

    pub(crate) fn is_sent(&self) -> bool {
        matches!(self, FirstValue::Sent(_))
    }

    /// The cached element, if one has been taken.
    pub(crate) fn value(&self) -> Option<&T> {
        match self {
            FirstValue::Fresh => None,
            FirstValue::Unsent(value) | FirstValue::Sent(value) => value.as_ref(),
        }
    }

    /// Store the element pulled by a peek.
    pub(crate) fn take(&mut self, value: Option<T>) {
        debug_assert!(!self.is_taken());
        *self = FirstValue::Unsent(value);
    }

    /// Store the element pulled by a traversal step and return the copy to hand out.
    pub(crate) fn take_and_send(&mut self, value: Option<T>) -> Option<T>
    where
        T: Clone,
    {
        debug_assert!(!self.is_taken());
        *self = FirstValue::Sent(value.clone());
        value
    }

    /// Deliver a peeked element to the traversal.
    ///
    /// Returns `None` unless the element was taken but not yet sent.
    pub(crate) fn send(&mut self) -> Option<Option<T>>
    where
        T: Clone,
    {
        match mem::replace(self, FirstValue::Fresh) {
            FirstValue::Unsent(value) => {
                *self = FirstValue::Sent(value.clone());
                Some(value)
            }
            other => {
                *self = other;
                None
            }
        }
    }
}

//! A clonable, single-threaded handle to one [`Sequence`].
//!
//! Every clone of a [`SharedSequence`] reads from the same cursor and the same
//! first-value cache, and all operations take `&self`. This is what lets a
//! caller iterate the handle while also calling it from inside the loop body.
//! Each operation borrows the inner sequence only for its own duration; a
//! producer that calls back into the handle that is pulling it panics with a
//! `RefCell` borrow error.
//!
//! ```rust
//! use sequence::prelude::*;
//!
//! let seq = create_sequence(vec![1, 2, 3, 4, 5]).into_shared();
//! let mut received = Vec::new();
//! for v in &seq {
//!     received.push(v);
//!     // the loop and direct calls share one cursor
//!     received.extend(seq.next());
//! }
//! assert_eq!(received, vec![1, 2, 3, 4, 5]);
//! assert_eq!(seq.first(), Some(1));
//! ```

use std::{cell::RefCell, convert::Infallible, fmt, rc::Rc};

use crate::{
    error::SequenceError,
    producer::{IntoProducer, ProducerKind},
    sequence::{Sequence, SequenceState},
};

/// Reference-counted handle to a [`Sequence`]; clones share one cursor.
pub struct SharedSequence<T, E = Infallible> {
    inner: Rc<RefCell<Sequence<T, E>>>,
}

impl<T, E> Clone for SharedSequence<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, E> Sequence<T, E> {
    /// Move this sequence behind a clonable handle.
    pub fn into_shared(self) -> SharedSequence<T, E> {
        SharedSequence::from(self)
    }
}

impl<T, E> From<Sequence<T, E>> for SharedSequence<T, E> {
    fn from(sequence: Sequence<T, E>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(sequence)),
        }
    }
}

impl<T: Clone> SharedSequence<T> {
    /// See [`Sequence::next`].
    pub fn next(&self) -> Option<T> {
        self.inner.borrow_mut().next()
    }

    /// See [`Sequence::first`]. Returns a copy since the cache stays inside the handle.
    pub fn first(&self) -> Option<T> {
        self.inner.borrow_mut().first().cloned()
    }
}

impl<T: Clone, E> SharedSequence<T, E> {
    /// See [`Sequence::try_next`].
    pub fn try_next(&self) -> Result<Option<T>, E> {
        self.inner.borrow_mut().try_next()
    }

    /// See [`Sequence::try_first`].
    pub fn try_first(&self) -> Result<Option<T>, E> {
        self.inner.borrow_mut().try_first().map(|v| v.cloned())
    }
}

impl<T, E> SharedSequence<T, E> {
    /// Always fails; see [`Sequence::set_first`].
    pub fn set_first(&self, value: T) -> Result<(), SequenceError> {
        self.inner.borrow().set_first(value)
    }

    /// Always fails; see [`Sequence::rebind`].
    pub fn rebind<P>(&self, producer: P) -> Result<(), SequenceError>
    where
        P: IntoProducer<T, E>,
    {
        self.inner.borrow().rebind(producer)
    }

    /// See [`Sequence::state`].
    pub fn state(&self) -> SequenceState {
        self.inner.borrow().state()
    }

    /// See [`Sequence::kind`].
    pub fn kind(&self) -> ProducerKind {
        self.inner.borrow().kind()
    }

    /// `true` if both handles refer to the same sequence.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Recover the sequence if this is the last handle.
    pub fn try_unwrap(self) -> Result<Sequence<T, E>, Self> {
        Rc::try_unwrap(self.inner)
            .map(RefCell::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<T, E> fmt::Debug for SharedSequence<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(sequence) => f.debug_tuple("SharedSequence").field(&*sequence).finish(),
            Err(_) => f.write_str("SharedSequence(<borrowed>)"),
        }
    }
}

/// Iterator over a [`SharedSequence`], borrowing the sequence one step at a time.
pub struct SharedIter<'a, T> {
    shared: &'a SharedSequence<T>,
}

impl<T: Clone> Iterator for SharedIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.shared.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.shared.inner.try_borrow() {
            Ok(sequence) => sequence.size_hint(),
            Err(_) => (0, None),
        }
    }
}

impl<'a, T: Clone> IntoIterator for &'a SharedSequence<T> {
    type Item = T;
    type IntoIter = SharedIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        SharedIter { shared: self }
    }
}

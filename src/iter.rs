//! Iterator adapters borrowing a [`Sequence`].
//!
//! Both adapters step the sequence exactly like repeated calls to
//! [`Sequence::next`] / [`Sequence::try_next`], so iteration and calls can be
//! mixed freely. The adapters hold no state of their own: dropping one (for
//! example by `break`ing out of a `for` loop) leaves the sequence positioned
//! right after the last element it produced.
//!
//! # Examples
//!
//! ```rust
//! use sequence::prelude::*;
//!
//! let mut seq = create_sequence(Producer::iterable(1..));
//! let firsts: Vec<_> = seq.iter().take(3).collect();
//! assert_eq!(firsts, vec![1, 2, 3]);
//! // a fresh iterator resumes where the last one stopped
//! assert_eq!(seq.iter().next(), Some(4));
//! assert_eq!(seq.next(), Some(5));
//! ```

use std::{convert::Infallible, iter::FusedIterator};

use crate::sequence::Sequence;

/// Iterator over an infallible [`Sequence`]. Created by [`Sequence::iter`].
pub struct Iter<'a, T> {
    sequence: &'a mut Sequence<T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(sequence: &'a mut Sequence<T>) -> Self {
        Self { sequence }
    }
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.sequence.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sequence.size_hint()
    }
}

impl<T: Clone> FusedIterator for Iter<'_, T> {}

/// Iterator over a fallible [`Sequence`]. Created by [`Sequence::try_iter`].
///
/// Producer errors come out as `Err` items. The iteration does not stop on
/// them; collect into `Result<Vec<_>, _>` to stop at the first one.
///
/// ```rust
/// use sequence::prelude::*;
///
/// let mut seq = Sequence::from_producer(Producer::try_iterable(vec![Ok(1), Err("bad"), Ok(3)]));
/// let collected: Result<Vec<_>, _> = seq.try_iter().collect();
/// assert_eq!(collected, Err("bad"));
/// assert_eq!(seq.try_next(), Ok(Some(3)));
/// ```
pub struct TryIter<'a, T, E> {
    sequence: &'a mut Sequence<T, E>,
}

impl<'a, T, E> TryIter<'a, T, E> {
    pub(crate) fn new(sequence: &'a mut Sequence<T, E>) -> Self {
        Self { sequence }
    }
}

impl<T: Clone, E> Iterator for TryIter<'_, T, E> {
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.sequence.try_next().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.sequence.size_hint();
        // errors may interleave, so only the upper bound is meaningful
        (0, upper)
    }
}

impl<'a, T: Clone> From<TryIter<'a, T, Infallible>> for Iter<'a, T> {
    fn from(iter: TryIter<'a, T, Infallible>) -> Self {
        Iter::new(iter.sequence)
    }
}

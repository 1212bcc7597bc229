//! The unified handle: call it, iterate it, or peek at its first element.
//!
//! A [`Sequence`] multiplexes three access modes over one lazily started source:
//!
//! - [`next`](Sequence::next) pulls the next element of the traversal
//! - [`iter`](Sequence::iter) walks the same traversal with `Iterator`
//! - [`first`](Sequence::first) returns the first element, pulling it if needed
//!
//! Calls and iteration steps share one cursor, so any interleaving of them
//! sees every produced element exactly once, in producer order. Peeking never
//! consumes: a peeked element is still delivered by the next call or step.
//!
//! ```rust
//! use sequence::prelude::*;
//!
//! let mut seq = create_sequence(vec!['a', 'b', 'c', 'd', 'e', 'f']);
//! let mut received = vec![seq.next().unwrap(), seq.next().unwrap()];
//! for v in seq.iter() {
//!     received.push(v);
//!     if v == 'd' {
//!         break;
//!     }
//! }
//! received.extend(seq.next());
//! received.extend(seq.next());
//! assert_eq!(received, ['a', 'b', 'c', 'd', 'e', 'f']);
//! assert_eq!(seq.first(), Some(&'a'));
//! ```

use std::{convert::Infallible, fmt};

use crate::{
    error::SequenceError,
    first::FirstValue,
    iter::{Iter, TryIter},
    producer::{IntoProducer, Producer, ProducerKind},
    shape::Shape,
    source::LazySource,
};

/// Where a [`Sequence`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceState {
    /// Nothing pulled yet.
    Fresh,
    /// The first element was peeked but not yet delivered.
    FirstTakenUnsent,
    /// The first element was delivered; nothing after it yet.
    FirstSent,
    /// Elements after the first have been delivered.
    Advancing,
    /// The source reported its end. Terminal.
    Exhausted,
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SequenceState::Fresh => "fresh",
            SequenceState::FirstTakenUnsent => "first-taken-unsent",
            SequenceState::FirstSent => "first-sent",
            SequenceState::Advancing => "advancing",
            SequenceState::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// A lazily evaluated stream of values accessible by call, iteration, or first-value peek.
///
/// Producers that may fail use `E` for their error type; infallible ones use
/// the default [`Infallible`] and get the `next`/`first`/`iter` shorthands.
///
/// A sequence owns boxed producer closures and is therefore neither `Send` nor
/// `Sync`. To share one between several owners on a thread, use
/// [`SharedSequence`](crate::SharedSequence).
pub struct Sequence<T, E = Infallible> {
    source: LazySource<T, E>,
    first: FirstValue<T>,
    advancing: bool,
}

/// Create a sequence from an infallible producer.
///
/// ```rust
/// use sequence::prelude::*;
///
/// let mut seq = create_sequence(Producer::callable(|| 1));
/// assert_eq!(seq.next(), Some(1));
/// assert_eq!(seq.first(), Some(&1));
/// assert_eq!(seq.iter().next(), Some(1));
/// ```
pub fn create_sequence<T, P>(producer: P) -> Sequence<T>
where
    P: IntoProducer<T>,
{
    Sequence::new(producer)
}

impl<T> Sequence<T> {
    /// Create a sequence from an infallible producer.
    pub fn new<P>(producer: P) -> Self
    where
        P: IntoProducer<T>,
    {
        Self::from_producer(producer)
    }

    /// Next element of the traversal, or `None` once a finite producer is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<T>
    where
        T: Clone,
    {
        match self.try_next() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// The first element, pulled on first use and cached afterwards.
    ///
    /// Never advances the traversal: a peeked element is still returned by
    /// the next call to [`next`](Sequence::next) or the next iteration step.
    pub fn first(&mut self) -> Option<&T> {
        match self.try_first() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Iterate the remaining traversal.
    ///
    /// Each call continues from the shared cursor; breaking out early leaves
    /// the cursor right after the last element produced.
    pub fn iter(&mut self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

impl<T, E> Sequence<T, E> {
    /// Create a sequence from any producer, fallible or not.
    pub fn from_producer<P>(producer: P) -> Self
    where
        P: IntoProducer<T, E>,
    {
        let producer: Producer<T, E> = producer.into_producer();
        tracing::debug!(kind = %producer.kind(), "sequence.create");
        Self {
            source: LazySource::new(producer),
            first: FirstValue::Fresh,
            advancing: false,
        }
    }

    /// Classify a dynamic [`Shape`] and create a sequence from the winning capability.
    pub fn from_shape(shape: Shape<T, E>) -> Result<Self, SequenceError> {
        shape.classify().map(Self::from_producer)
    }

    /// Fallible form of [`next`](Sequence::next).
    ///
    /// A producer error is returned as-is and leaves the sequence unchanged,
    /// so calling again retries the same pull.
    pub fn try_next(&mut self) -> Result<Option<T>, E>
    where
        T: Clone,
    {
        if !self.first.is_taken() {
            let value = self.source.pull()?;
            return Ok(self.first.take_and_send(value));
        }
        if let Some(value) = self.first.send() {
            return Ok(value);
        }
        let value = self.source.pull()?;
        self.advancing = true;
        Ok(value)
    }

    /// Fallible form of [`first`](Sequence::first).
    pub fn try_first(&mut self) -> Result<Option<&T>, E> {
        if !self.first.is_taken() {
            let value = self.source.pull()?;
            self.first.take(value);
        }
        Ok(self.first.value())
    }

    /// Iterate the remaining traversal, yielding producer errors as `Err` items.
    ///
    /// An `Err` item does not end the iteration; the next step retries.
    pub fn try_iter(&mut self) -> TryIter<'_, T, E> {
        TryIter::new(self)
    }

    /// The first-value slot is read-only. Always fails with [`SequenceError::NotAllowed`].
    ///
    /// ```rust
    /// use sequence::prelude::*;
    ///
    /// let mut seq = create_sequence(Producer::callable(|| 1));
    /// assert_eq!(seq.first(), Some(&1));
    /// assert_eq!(seq.set_first(2), Err(SequenceError::NotAllowed));
    /// assert_eq!(seq.first(), Some(&1));
    /// ```
    pub fn set_first(&self, _value: T) -> Result<(), SequenceError> {
        tracing::debug!(target_slot = "first", state = %self.state(), "sequence.mutation.rejected");
        Err(SequenceError::NotAllowed)
    }

    /// A sequence stays bound to its original producer. Always fails with
    /// [`SequenceError::NotAllowed`]; the rejected producer is dropped unused.
    pub fn rebind<P>(&self, _producer: P) -> Result<(), SequenceError>
    where
        P: IntoProducer<T, E>,
    {
        tracing::debug!(target_slot = "producer", state = %self.state(), "sequence.mutation.rejected");
        Err(SequenceError::NotAllowed)
    }

    /// Where the sequence is in its lifecycle.
    pub fn state(&self) -> SequenceState {
        if self.source.is_exhausted() {
            return SequenceState::Exhausted;
        }
        match (self.first.is_taken(), self.first.is_sent(), self.advancing) {
            (false, _, _) => SequenceState::Fresh,
            (true, false, _) => SequenceState::FirstTakenUnsent,
            (true, true, false) => SequenceState::FirstSent,
            (true, true, true) => SequenceState::Advancing,
        }
    }

    /// `true` once a finite producer has reported its end.
    pub fn is_exhausted(&self) -> bool {
        self.source.is_exhausted()
    }

    /// Shape of the producer this sequence was built from.
    pub fn kind(&self) -> ProducerKind {
        self.source.kind()
    }

    /// Bounds on the number of traversal elements still to come.
    pub(crate) fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.source.size_hint();
        match &self.first {
            FirstValue::Unsent(Some(_)) => (
                lower.saturating_add(1),
                upper.and_then(|n| n.checked_add(1)),
            ),
            _ => (lower, upper),
        }
    }
}

impl<T, E> fmt::Debug for Sequence<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("kind", &self.kind())
            .field("state", &self.state())
            .field("pulled", &self.source.pulled())
            .finish()
    }
}

impl<'a, T: Clone> IntoIterator for &'a mut Sequence<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> From<Producer<T>> for Sequence<T> {
    fn from(producer: Producer<T>) -> Self {
        Sequence::new(producer)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::VecDeque, rc::Rc};

    use super::*;
    use crate::producer::IndexedRecord;

    #[test]
    fn test_array_first_then_full_iteration() {
        let mut seq = create_sequence(vec!["a", "b", "c"]);
        assert_eq!(seq.first(), Some(&"a"));
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_array_like_matches_array() {
        let record = IndexedRecord::new(3).with(0, "a").with(1, "b").with(2, "c");
        let mut seq = create_sequence(record);
        assert_eq!(seq.first(), Some(&Some("a")));
        let all: Vec<_> = seq.iter().flatten().collect();
        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_array_like_hole_keeps_its_position() {
        let mut seq = create_sequence(IndexedRecord::new(3).with(1, "b"));
        assert_eq!(seq.first(), Some(&None));
        assert_eq!(seq.next(), Some(None));
        assert_eq!(seq.next(), Some(Some("b")));
        assert_eq!(seq.next(), Some(None));
        assert_eq!(seq.next(), None);
        assert!(seq.is_exhausted());
    }

    #[test]
    fn test_sequence_from_producer_conversion() {
        let mut seq: Sequence<u8> = Producer::iterable([3, 4]).into();
        assert_eq!(seq.kind(), ProducerKind::Iterable);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_custom_iterable() {
        let values = ["a", "b", "c"];
        let mut i = 0;
        let iter = std::iter::from_fn(move || {
            let v = values.get(i).copied();
            i += 1;
            v
        });
        let mut seq = create_sequence(Producer::iterable(iter));
        assert_eq!(seq.first(), Some(&"a"));
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_callable_with_sentinel_bounded_by_caller() {
        let mut values = VecDeque::from(["a", "b", "c"]);
        let mut seq = create_sequence(Producer::callable(move || values.pop_front()));
        assert_eq!(seq.first(), Some(&Some("a")));
        let received: Vec<_> = seq.iter().take(3).flatten().collect();
        assert_eq!(received, vec!["a", "b", "c"]);
        assert_eq!(seq.next(), Some(None));
    }

    #[test]
    fn test_first_is_stable_while_calls_advance() {
        let mut i = 42;
        let mut seq = create_sequence(Producer::callable(move || {
            i += 1;
            i - 1
        }));
        assert_eq!(seq.first(), Some(&42));
        assert_eq!(seq.next(), Some(42));
        assert_eq!(seq.first(), Some(&42));
        assert_eq!(seq.next(), Some(43));
        assert_eq!(seq.first(), Some(&42));
        assert_eq!(seq.next(), Some(44));
    }

    #[test]
    fn test_call_first_and_iterate_over_constant() {
        let mut seq = create_sequence(Producer::callable(|| 1));
        assert_eq!(seq.next(), Some(1));
        assert_eq!(seq.first(), Some(&1));
        if let Some(v) = seq.iter().next() {
            assert_eq!(v, 1);
        }
    }

    #[test]
    fn test_generator_shared_across_iterations() {
        let mut seq = create_sequence(Producer::generator(|| ["a", "b", "c"]));
        assert_eq!(seq.first(), Some(&"a"));
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(seq.iter().count(), 0);
    }

    #[test]
    fn test_repeated_calls_then_exhaustion() {
        let mut seq = create_sequence(Producer::generator(|| ["a", "b", "c"]));
        assert_eq!(seq.next(), Some("a"));
        assert_eq!(seq.next(), Some("b"));
        assert_eq!(seq.next(), Some("c"));
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);
    }

    #[test]
    fn test_nothing_pulled_until_first_access() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut seq = create_sequence(Producer::callable(move || {
            counter.set(counter.get() + 1);
            counter.get()
        }));
        assert_eq!(calls.get(), 0);
        assert_eq!(seq.state(), SequenceState::Fresh);
        seq.first();
        seq.first();
        assert_eq!(calls.get(), 1);
        assert_eq!(seq.next(), Some(1));
        assert_eq!(calls.get(), 1);
        assert_eq!(seq.next(), Some(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut seq = create_sequence(vec![1, 2]);
        assert_eq!(seq.state(), SequenceState::Fresh);
        seq.first();
        assert_eq!(seq.state(), SequenceState::FirstTakenUnsent);
        seq.next();
        assert_eq!(seq.state(), SequenceState::FirstSent);
        seq.first();
        assert_eq!(seq.state(), SequenceState::FirstSent);
        seq.next();
        assert_eq!(seq.state(), SequenceState::Advancing);
        assert_eq!(seq.next(), None);
        assert_eq!(seq.state(), SequenceState::Exhausted);
        assert_eq!(seq.first(), Some(&1));
    }

    #[test]
    fn test_call_from_fresh_goes_straight_to_first_sent() {
        let mut seq = create_sequence(Producer::iterable(0..));
        seq.next();
        assert_eq!(seq.state(), SequenceState::FirstSent);
    }

    #[test]
    fn test_empty_producer() {
        let mut seq: Sequence<u8> = create_sequence(Vec::new());
        assert_eq!(seq.first(), None);
        assert_eq!(seq.state(), SequenceState::Exhausted);
        assert_eq!(seq.next(), None);
        assert_eq!(seq.iter().count(), 0);
    }

    #[test]
    fn test_mutations_rejected_without_side_effects() {
        let mut seq = create_sequence(vec![1, 2, 3]);
        assert_eq!(seq.set_first(9), Err(SequenceError::NotAllowed));
        assert_eq!(seq.rebind(vec![7]), Err(SequenceError::NotAllowed));
        assert_eq!(seq.state(), SequenceState::Fresh);
        assert_eq!(seq.first(), Some(&1));
        assert_eq!(seq.set_first(9), Err(SequenceError::NotAllowed));
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_try_first_retries_after_failure() {
        let mut attempts = 0;
        let mut seq = Sequence::from_producer(Producer::try_callable(move || {
            attempts += 1;
            if attempts == 1 { Err("cold") } else { Ok(attempts * 10) }
        }));
        assert_eq!(seq.try_first(), Err("cold"));
        assert_eq!(seq.state(), SequenceState::Fresh);
        assert_eq!(seq.try_first(), Ok(Some(&20)));
        assert_eq!(seq.try_next(), Ok(Some(20)));
        assert_eq!(seq.try_next(), Ok(Some(30)));
    }

    #[test]
    fn test_error_after_first_keeps_cursor() {
        let mut seq = Sequence::from_producer(Producer::try_iterable(vec![
            Ok(1),
            Err("gap"),
            Ok(2),
        ]));
        assert_eq!(seq.try_next(), Ok(Some(1)));
        assert_eq!(seq.try_next(), Err("gap"));
        assert_eq!(seq.state(), SequenceState::FirstSent);
        assert_eq!(seq.try_next(), Ok(Some(2)));
        assert_eq!(seq.try_next(), Ok(None));
        assert_eq!(seq.try_first(), Ok(Some(&1)));
    }

    #[test]
    fn test_size_hint_counts_unsent_first() {
        let mut seq = create_sequence(vec![1, 2, 3]);
        assert_eq!(seq.size_hint(), (3, Some(3)));
        seq.first();
        assert_eq!(seq.size_hint(), (3, Some(3)));
        seq.next();
        assert_eq!(seq.size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_debug_shows_kind_and_state() {
        let seq = create_sequence(Producer::callable(|| 0));
        let text = format!("{seq:?}");
        assert!(text.contains("Callable"));
        assert!(text.contains("Fresh"));
    }
}

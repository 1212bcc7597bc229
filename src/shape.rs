//! Capability-based producer classification.
//!
//! Most callers build a [`Producer`] variant directly. When a value arrives
//! with several capabilities at once (say, a record that is both indexable and
//! has its own iterator), a [`Shape`] collects every capability it offers and
//! [`classify`](Shape::classify) picks exactly one, strongest first:
//!
//! 1. iterable
//! 2. generator factory
//! 3. collection
//! 4. array-like
//! 5. repeatable callable
//!
//! Classification is pure dispatch: no element is pulled and no generator
//! factory is invoked. A shape with no capability is rejected with
//! [`SequenceError::Unclassifiable`] instead of yielding an empty sequence.
//!
//! ```rust
//! use sequence::prelude::*;
//!
//! let shape = Shape::new()
//!     .with(Producer::array_like(vec!['x', 'y']))
//!     .with(Producer::iterable("abc".chars()));
//! assert_eq!(shape.winner(), Some(ProducerKind::Iterable));
//!
//! let mut seq = Sequence::from_shape(shape).unwrap();
//! assert_eq!(seq.iter().collect::<String>(), "abc");
//! ```

use std::{convert::Infallible, fmt};

use crate::{
    error::SequenceError,
    producer::{IntoProducer, Producer, ProducerKind},
};

/// A bag of producer capabilities, at most one per [`ProducerKind`].
pub struct Shape<T, E = Infallible> {
    slots: [Option<Producer<T, E>>; ProducerKind::COUNT],
}

impl<T> Shape<T> {
    /// An empty shape for infallible producers. Use [`Shape::default`] for other error types.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, E> Shape<T, E> {
    /// Add a capability. A later capability of the same kind replaces the earlier one.
    pub fn with<P>(mut self, capability: P) -> Self
    where
        P: IntoProducer<T, E>,
    {
        self.insert(capability);
        self
    }

    /// Add a capability, returning the one of the same kind it replaced.
    pub fn insert<P>(&mut self, capability: P) -> Option<Producer<T, E>>
    where
        P: IntoProducer<T, E>,
    {
        let producer = capability.into_producer();
        let slot = producer.kind().priority();
        self.slots[slot].replace(producer)
    }

    /// Kinds present, strongest first.
    pub fn capabilities(&self) -> Vec<ProducerKind> {
        self.slots
            .iter()
            .flatten()
            .map(Producer::kind)
            .collect()
    }

    /// Kind that [`classify`](Shape::classify) would select.
    pub fn winner(&self) -> Option<ProducerKind> {
        self.slots.iter().flatten().map(Producer::kind).next()
    }

    /// `true` if no capability has been added.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Select the strongest capability; the others are dropped.
    pub fn classify(self) -> Result<Producer<T, E>, SequenceError> {
        let offered = self.capabilities();
        match self.slots.into_iter().flatten().next() {
            Some(producer) => {
                tracing::debug!(
                    kind = %producer.kind(),
                    offered = offered.len(),
                    "sequence.classify"
                );
                Ok(producer)
            }
            None => {
                tracing::debug!("sequence.classify.unclassifiable");
                Err(SequenceError::Unclassifiable)
            }
        }
    }
}

impl<T, E> Default for Shape<T, E> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<T, E> fmt::Debug for Shape<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

impl<T, E> From<Producer<T, E>> for Shape<T, E> {
    fn from(producer: Producer<T, E>) -> Self {
        Shape::default().with(producer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_shape() -> Shape<&'static str> {
        Shape::new()
            .with(Producer::callable(|| "callable"))
            .with(Producer::array_like(vec!["array-like"]))
            .with(vec!["collection"])
            .with(Producer::generator(|| ["generator"]))
            .with(Producer::iterable(["iterable"]))
    }

    fn first_of(producer: Producer<&'static str>) -> Option<&'static str> {
        crate::Sequence::new(producer).next()
    }

    #[test]
    fn test_priority_order_is_applied() {
        let shape = full_shape();
        assert_eq!(
            shape.capabilities(),
            vec![
                ProducerKind::Iterable,
                ProducerKind::Generator,
                ProducerKind::Collection,
                ProducerKind::ArrayLike,
                ProducerKind::Callable,
            ]
        );

        let expected = ["iterable", "generator", "collection", "array-like", "callable"];
        for (skip, want) in expected.into_iter().enumerate() {
            let mut shape = full_shape();
            for kind in shape.capabilities().into_iter().take(skip) {
                shape.slots[kind.priority()] = None;
            }
            let winner = shape.winner();
            let producer = shape.classify().unwrap();
            assert_eq!(Some(producer.kind()), winner);
            assert_eq!(first_of(producer), Some(want));
        }
    }

    #[test]
    fn test_array_like_with_iterator_uses_iterator() {
        let shape = Shape::new()
            .with(Producer::array_like(vec![1, 2, 3]))
            .with(Producer::iterable(vec![9]));
        let mut seq = crate::Sequence::from_shape(shape).unwrap();
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_empty_shape_is_rejected() {
        let shape: Shape<u8> = Shape::default();
        assert!(shape.is_empty());
        assert_eq!(shape.classify().unwrap_err(), SequenceError::Unclassifiable);
        assert!(crate::Sequence::from_shape(Shape::<u8>::new()).is_err());
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let mut shape: Shape<u8> = Shape::new();
        assert!(shape.insert(vec![1]).is_none());
        let previous = shape.insert(vec![2]).unwrap();
        assert_eq!(previous.kind(), ProducerKind::Collection);
        assert_eq!(shape.capabilities(), vec![ProducerKind::Collection]);
        assert_eq!(first_of_u8(shape.classify().unwrap()), Some(2));
    }

    #[test]
    fn test_classify_does_not_invoke_generator() {
        let shape: Shape<u8> = Shape::new().with(Producer::generator(|| -> Vec<u8> {
            panic!("factory ran during classification")
        }));
        assert_eq!(shape.classify().unwrap().kind(), ProducerKind::Generator);
    }

    #[test]
    fn test_shape_from_single_producer() {
        let shape: Shape<u8> = Producer::callable(|| 7).into();
        assert!(!shape.is_empty());
        assert_eq!(shape.capabilities(), vec![ProducerKind::Callable]);
        assert_eq!(first_of_u8(shape.classify().unwrap()), Some(7));
    }

    fn first_of_u8(producer: Producer<u8>) -> Option<u8> {
        crate::Sequence::new(producer).next()
    }
}

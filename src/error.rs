//! Errors raised by the sequence itself.
//!
//! Failures coming out of a producer are never wrapped: they keep the
//! producer's own error type `E` and surface from `try_next`, `try_first` and
//! [`TryIter`](crate::TryIter) unchanged.

use thiserror::Error;

/// Errors raised by a [`Sequence`](crate::Sequence) or the [`Shape`](crate::Shape) classifier.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Writing the first-value slot or rebinding the producer.
    #[error("This operation is not allowed")]
    NotAllowed,

    /// A [`Shape`](crate::Shape) exposed none of the supported capabilities.
    #[error("producer matches none of the supported shapes")]
    Unclassifiable,
}

//! Commonly used imports
//!
//! Use `use sequence::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Sequence, SequenceError, SequenceState, SharedSequence};

// Producers
pub use crate::{ArrayLike, IndexedRecord, IntoProducer, Producer, ProducerKind, Shape};

// Construction
pub use crate::create_sequence;

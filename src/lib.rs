//! # Sequence: one handle, three ways to read it
//!
//! Turn a collection, an iterator, a generator factory, or a repeatable closure
//! into a single [`Sequence`] that can be
//!
//! - **called** with [`next()`](Sequence::next) to pull the next value,
//! - **iterated** with [`iter()`](Sequence::iter) or `for v in &mut seq`,
//! - **peeked** with [`first()`](Sequence::first) for its first value, any number of times.
//!
//! Calls and iteration share one cursor, so every produced value is seen
//! exactly once across all of them. Peeking never consumes.
//!
//! ## Example
//!
//! ```
//! use sequence::prelude::*;
//!
//! let mut i = 42;
//! let mut seq = create_sequence(Producer::callable(move || {
//!     i += 1;
//!     i - 1
//! }));
//!
//! assert_eq!(seq.first(), Some(&42));
//! assert_eq!(seq.next(), Some(42));
//! assert_eq!(seq.first(), Some(&42));
//! assert_eq!(seq.next(), Some(43));
//! assert_eq!(seq.iter().take(2).collect::<Vec<_>>(), vec![44, 45]);
//! ```
//!
//! ## Producers
//!
//! - [`Producer::collection`] / `Vec<T>` / `[T; N]` - finite ordered buffer
//! - [`Producer::array_like`] / [`IndexedRecord`] - length plus indexed items
//! - [`Producer::iterable`] - any iterator, driven once
//! - [`Producer::generator`] - factory called once per sequence
//! - [`Producer::callable`] - closure called once per element, forever
//!
//! Fallible producers (`try_iterable`, `try_generator`, `try_callable`) give a
//! `Sequence<T, E>` read through [`try_next`](Sequence::try_next),
//! [`try_first`](Sequence::try_first) and [`try_iter`](Sequence::try_iter).
//!
//! When a value offers several shapes at once, [`Shape`] picks one by a fixed
//! priority.

mod error;
mod first;
mod iter;
mod producer;
mod sequence;
mod shape;
mod shared;
mod source;

pub mod prelude;

pub use error::*;
pub use iter::*;
pub use producer::*;
pub use sequence::*;
pub use shape::*;
pub use shared::*;

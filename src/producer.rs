//! The closed set of producer shapes a [`Sequence`](crate::Sequence) can be built from.
//!
//! A [`Producer`] is one of:
//!
//! - [`Producer::Collection`]: a finite ordered buffer (`Vec<T>`, `[T; N]`)
//! - [`Producer::ArrayLike`]: anything with a length and indexed items, see [`ArrayLike`]
//! - [`Producer::Iterable`]: an iterator, driven once to exhaustion (or forever)
//! - [`Producer::Generator`]: a factory invoked once to obtain an iterator
//! - [`Producer::Callable`]: a closure called once per element, forever
//!
//! Each shape has an infallible constructor (elements of type `T`) and, where
//! the shape runs caller code per element, a `try_` constructor whose elements
//! are `Result<T, E>`.
//!
//! # Examples
//!
//! ```rust
//! use sequence::prelude::*;
//!
//! let mut i = 0;
//! let mut seq = create_sequence(Producer::callable(move || {
//!     i += 1;
//!     i
//! }));
//! assert_eq!(seq.next(), Some(1));
//! assert_eq!(seq.next(), Some(2));
//! ```

use std::{collections::BTreeMap, convert::Infallible, fmt};

use either::Either;

/// Boxed iterator of fallible elements, the common currency of every non-buffered shape.
pub type BoxIter<T, E> = Box<dyn Iterator<Item = Result<T, E>>>;

/// Boxed generator factory.
pub type BoxFactory<T, E> = Box<dyn FnOnce() -> BoxIter<T, E>>;

/// Boxed repeatable callable.
pub type BoxCallable<T, E> = Box<dyn FnMut() -> Result<T, E>>;

/// An indexable value with a known length.
///
/// Items are read once, in index order, the first time the sequence is pulled.
/// Every index in `0..length()` yields exactly one element, so a sequence over
/// an array-like has the same length as the array-like itself. Types with
/// holes express them in `T`; [`IndexedRecord<T>`] is an `ArrayLike<Option<T>>`.
///
/// ```rust
/// use sequence::prelude::*;
///
/// let record = IndexedRecord::new(3).with(0, 'a').with(2, 'c');
/// let mut seq = create_sequence(record);
/// assert_eq!(seq.first(), Some(&Some('a')));
/// assert_eq!(seq.iter().collect::<Vec<_>>(), [Some('a'), None, Some('c')]);
/// ```
pub trait ArrayLike<T> {
    /// Number of indices to visit.
    fn length(&self) -> usize;

    /// Item at `index`. Only called for `index < length()`.
    fn item(&self, index: usize) -> T;
}

impl<T: Clone> ArrayLike<T> for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }

    fn item(&self, index: usize) -> T {
        self[index].clone()
    }
}

/// A sparse index-to-value record with an explicit length.
///
/// Unset indices below `length` are holes and come through as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord<T> {
    entries: BTreeMap<usize, T>,
    length: usize,
}

impl<T> IndexedRecord<T> {
    /// Create an empty record that reports `length` indices.
    pub fn new(length: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            length,
        }
    }

    /// Set the item at `index`.
    ///
    /// Indices at or past `length` are stored but never visited.
    pub fn with(mut self, index: usize, value: T) -> Self {
        self.entries.insert(index, value);
        self
    }

    /// Set the item at `index`, returning the value it replaced.
    pub fn insert(&mut self, index: usize, value: T) -> Option<T> {
        self.entries.insert(index, value)
    }
}

impl<T: Clone> ArrayLike<Option<T>> for IndexedRecord<T> {
    fn length(&self) -> usize {
        self.length
    }

    fn item(&self, index: usize) -> Option<T> {
        self.entries.get(&index).cloned()
    }
}

/// Discriminant of a [`Producer`].
///
/// The declaration order is the classification priority used by
/// [`Shape`](crate::Shape): earlier kinds win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProducerKind {
    /// [`Producer::Iterable`]
    Iterable,
    /// [`Producer::Generator`]
    Generator,
    /// [`Producer::Collection`]
    Collection,
    /// [`Producer::ArrayLike`]
    ArrayLike,
    /// [`Producer::Callable`]
    Callable,
}

impl ProducerKind {
    pub(crate) const COUNT: usize = 5;

    /// Position in the classification order, `0` being the strongest.
    #[inline]
    pub const fn priority(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ProducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProducerKind::Iterable => "iterable",
            ProducerKind::Generator => "generator",
            ProducerKind::Collection => "collection",
            ProducerKind::ArrayLike => "array-like",
            ProducerKind::Callable => "callable",
        };
        f.write_str(name)
    }
}

/// A caller-supplied description of how to produce elements.
pub enum Producer<T, E = Infallible> {
    /// Finite ordered buffer.
    Collection(Vec<T>),
    /// Length plus indexed items, snapshotted on first pull, one element per index.
    ArrayLike(Box<dyn ArrayLike<T>>),
    /// Iterator used as-is.
    Iterable(BoxIter<T, E>),
    /// Factory invoked exactly once, on first pull.
    Generator(BoxFactory<T, E>),
    /// Closure called once per element, never interpreted as finished.
    Callable(BoxCallable<T, E>),
}

impl<T: 'static> Producer<T> {
    /// Finite ordered buffer.
    pub fn collection(items: impl Into<Vec<T>>) -> Self {
        Producer::Collection(items.into())
    }

    /// Value with a length and indexed items.
    pub fn array_like<A>(value: A) -> Self
    where
        A: ArrayLike<T> + 'static,
    {
        Producer::ArrayLike(Box::new(value))
    }

    /// Any iterable; its iterator is obtained now and driven lazily.
    pub fn iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Producer::Iterable(Box::new(iterable.into_iter().map(Ok::<T, Infallible>)))
    }

    /// Factory returning an iterable. Called once per sequence.
    ///
    /// ```rust
    /// use sequence::prelude::*;
    ///
    /// let mut seq = create_sequence(Producer::generator(|| ["a", "b", "c"]));
    /// assert_eq!(seq.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    /// // the factory is not called again
    /// assert_eq!(seq.iter().count(), 0);
    /// ```
    pub fn generator<F, I>(factory: F) -> Self
    where
        F: FnOnce() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Producer::Generator(Box::new(move || {
            Box::new(factory().into_iter().map(Ok::<T, Infallible>)) as BoxIter<T, Infallible>
        }))
    }

    /// Closure called once per requested element.
    pub fn callable<F>(mut f: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        Producer::Callable(Box::new(move || Ok::<T, Infallible>(f())))
    }

    /// Reinterpret an infallible producer under any error type.
    pub fn with_error<E: 'static>(self) -> Producer<T, E> {
        match self {
            Producer::Collection(items) => Producer::Collection(items),
            Producer::ArrayLike(value) => Producer::ArrayLike(value),
            Producer::Iterable(iter) => Producer::Iterable(Box::new(iter.map(never::<T, E>))),
            Producer::Generator(factory) => Producer::Generator(Box::new(move || {
                Box::new(factory().map(never::<T, E>)) as BoxIter<T, E>
            })),
            Producer::Callable(mut f) => Producer::Callable(Box::new(move || never::<T, E>(f()))),
        }
    }
}

impl<T: 'static, E: 'static> Producer<T, E> {
    /// Iterable whose elements may fail.
    pub fn try_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = Result<T, E>>,
        I::IntoIter: 'static,
    {
        Producer::Iterable(Box::new(iterable.into_iter()))
    }

    /// Factory returning an iterable whose elements may fail.
    pub fn try_generator<F, I>(factory: F) -> Self
    where
        F: FnOnce() -> I + 'static,
        I: IntoIterator<Item = Result<T, E>>,
        I::IntoIter: 'static,
    {
        Producer::Generator(Box::new(move || Box::new(factory().into_iter()) as BoxIter<T, E>))
    }

    /// Closure whose calls may fail.
    ///
    /// ```rust
    /// use sequence::prelude::*;
    ///
    /// let mut calls = 0;
    /// let mut seq = Sequence::from_producer(Producer::try_callable(move || {
    ///     calls += 1;
    ///     if calls == 1 { Err("warming up") } else { Ok(calls) }
    /// }));
    /// assert_eq!(seq.try_next(), Err("warming up"));
    /// assert_eq!(seq.try_next(), Ok(Some(2)));
    /// ```
    pub fn try_callable<F>(f: F) -> Self
    where
        F: FnMut() -> Result<T, E> + 'static,
    {
        Producer::Callable(Box::new(f))
    }
}

impl<T, E> Producer<T, E> {
    /// Which variant this is.
    pub fn kind(&self) -> ProducerKind {
        match self {
            Producer::Collection(_) => ProducerKind::Collection,
            Producer::ArrayLike(_) => ProducerKind::ArrayLike,
            Producer::Iterable(_) => ProducerKind::Iterable,
            Producer::Generator(_) => ProducerKind::Generator,
            Producer::Callable(_) => ProducerKind::Callable,
        }
    }
}

impl<T, E> fmt::Debug for Producer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Producer").field(&self.kind()).finish()
    }
}

fn never<T, E>(result: Result<T, Infallible>) -> Result<T, E> {
    match result {
        Ok(value) => Ok(value),
        Err(never) => match never {},
    }
}

/// Conversion into a [`Producer`].
///
/// Implemented for producers themselves, owned buffers, [`IndexedRecord`], and
/// [`Either`] of two convertible values, so a caller can pick a shape at runtime.
///
/// ```rust
/// use either::Either;
/// use sequence::prelude::*;
///
/// fn pick(fixed: bool) -> Either<Vec<u32>, Producer<u32>> {
///     if fixed { Either::Left(vec![7, 8]) } else { Either::Right(Producer::callable(|| 0)) }
/// }
///
/// assert_eq!(create_sequence(pick(true)).iter().collect::<Vec<_>>(), [7, 8]);
/// assert_eq!(create_sequence(pick(false)).next(), Some(0));
/// ```
pub trait IntoProducer<T, E = Infallible> {
    /// Wrap `self` in the matching [`Producer`] variant.
    fn into_producer(self) -> Producer<T, E>;
}

impl<T, E> IntoProducer<T, E> for Producer<T, E> {
    fn into_producer(self) -> Producer<T, E> {
        self
    }
}

impl<T, E> IntoProducer<T, E> for Vec<T> {
    fn into_producer(self) -> Producer<T, E> {
        Producer::Collection(self)
    }
}

impl<T, E, const N: usize> IntoProducer<T, E> for [T; N] {
    fn into_producer(self) -> Producer<T, E> {
        Producer::Collection(Vec::from(self))
    }
}

impl<T, E> IntoProducer<Option<T>, E> for IndexedRecord<T>
where
    T: Clone + 'static,
{
    fn into_producer(self) -> Producer<Option<T>, E> {
        Producer::ArrayLike(Box::new(self))
    }
}

impl<T, E, L, R> IntoProducer<T, E> for Either<L, R>
where
    L: IntoProducer<T, E>,
    R: IntoProducer<T, E>,
{
    fn into_producer(self) -> Producer<T, E> {
        match self {
            Either::Left(l) => l.into_producer(),
            Either::Right(r) => r.into_producer(),
        }
    }
}

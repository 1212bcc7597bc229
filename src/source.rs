//! The normalized pull-based element stream behind every sequence.
//!
//! A [`LazySource`] starts out holding the raw [`Producer`] and only turns it
//! into something pullable on the first [`pull`](LazySource::pull): buffers are
//! materialized, generator factories are invoked, iterators are started. From
//! then on each pull advances by exactly one element. Once the stream reports
//! its end the source is exhausted for good and never consults the producer
//! again.

use std::mem;

use crate::producer::{BoxCallable, BoxIter, Producer, ProducerKind};

pub(crate) struct LazySource<T, E> {
    state: SourceState<T, E>,
    kind: ProducerKind,
    pulled: usize,
}

enum SourceState<T, E> {
    Pending(Producer<T, E>),
    Buffered(std::vec::IntoIter<T>),
    Iterating(BoxIter<T, E>),
    Calling(BoxCallable<T, E>),
    Exhausted,
    // only observable if starting the producer panicked
    Invalid,
}

impl<T, E> SourceState<T, E> {
    fn take(&mut self) -> Self {
        mem::replace(self, SourceState::Invalid)
    }

    fn start(producer: Producer<T, E>) -> Self {
        match producer {
            Producer::Collection(items) => SourceState::Buffered(items.into_iter()),
            Producer::ArrayLike(value) => {
                let items: Vec<T> = (0..value.length()).map(|i| value.item(i)).collect();
                SourceState::Buffered(items.into_iter())
            }
            Producer::Iterable(iter) => SourceState::Iterating(iter),
            Producer::Generator(factory) => SourceState::Iterating(factory()),
            Producer::Callable(f) => SourceState::Calling(f),
        }
    }
}

impl<T, E> LazySource<T, E> {
    pub(crate) fn new(producer: Producer<T, E>) -> Self {
        Self {
            kind: producer.kind(),
            state: SourceState::Pending(producer),
            pulled: 0,
        }
    }

    pub(crate) fn kind(&self) -> ProducerKind {
        self.kind
    }

    /// Number of elements successfully pulled so far.
    pub(crate) fn pulled(&self) -> usize {
        self.pulled
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        matches!(self.state, SourceState::Exhausted | SourceState::Invalid)
    }

    /// Advance by one element.
    ///
    /// `Ok(None)` means the stream has ended. An `Err` leaves the source where
    /// it was, so the next pull asks the producer again.
    pub(crate) fn pull(&mut self) -> Result<Option<T>, E> {
        if matches!(self.state, SourceState::Pending(_)) {
            if let SourceState::Pending(producer) = self.state.take() {
                tracing::debug!(kind = %self.kind, "sequence.source.start");
                self.state = SourceState::start(producer);
            }
        }

        let step = match &mut self.state {
            SourceState::Buffered(items) => Ok(items.next()),
            SourceState::Iterating(iter) => iter.next().transpose(),
            SourceState::Calling(f) => f().map(Some),
            SourceState::Pending(_) | SourceState::Exhausted | SourceState::Invalid => Ok(None),
        };

        match &step {
            Ok(Some(_)) => {
                self.pulled += 1;
                tracing::trace!(kind = %self.kind, pulled = self.pulled, "sequence.source.pull");
            }
            Ok(None) if !self.is_exhausted() => {
                self.state = SourceState::Exhausted;
                tracing::debug!(kind = %self.kind, pulled = self.pulled, "sequence.source.exhausted");
            }
            Ok(None) => {}
            Err(_) => {
                tracing::debug!(kind = %self.kind, pulled = self.pulled, "sequence.source.failed");
            }
        }
        step
    }

    /// Bounds on the number of elements still to come.
    pub(crate) fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            SourceState::Pending(Producer::Collection(items)) => (items.len(), Some(items.len())),
            SourceState::Pending(Producer::ArrayLike(value)) => {
                let length = value.length();
                (length, Some(length))
            }
            SourceState::Pending(Producer::Iterable(iter)) => iter.size_hint(),
            SourceState::Pending(Producer::Generator(_)) => (0, None),
            SourceState::Pending(Producer::Callable(_)) | SourceState::Calling(_) => {
                (usize::MAX, None)
            }
            SourceState::Buffered(items) => items.size_hint(),
            SourceState::Iterating(iter) => iter.size_hint(),
            SourceState::Exhausted | SourceState::Invalid => (0, Some(0)),
        }
    }
}

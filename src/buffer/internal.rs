//! Internal BoundedBuffer implementation with blocking semantics
//!
//! This module provides the core buffer functionality with:
//! - Fixed capacity enforced on every insertion path
//! - Blocking, timed and non-blocking put/get variants
//! - FIFO ordering under concurrent access
//! - Pending-work completion tracking for drain coordination

use crate::buffer::error::{BufferError, BufferResult};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// State protected by the buffer mutex
#[derive(Debug)]
struct BufferState<T> {
    items: VecDeque<T>,
    /// Items put but not yet marked processed (completion tracking only,
    /// not capacity enforcement)
    pending: u64,
}

/// Fixed-capacity FIFO channel with blocking put/get
///
/// All operations are safe to call from any number of concurrent threads
/// without external locking. A full buffer suspends blocking `put` callers
/// until a `get` frees a slot; an empty buffer suspends blocking `get`
/// callers until an item arrives.
#[derive(Debug)]
pub struct BoundedBuffer<T> {
    state: Mutex<BufferState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    all_processed: Condvar,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// Create a buffer holding at most `capacity` items
    ///
    /// Fails with [`BufferError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> BufferResult<Self> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity {
                requested: capacity,
            });
        }

        Ok(Self {
            state: Mutex::new(BufferState {
                items: VecDeque::with_capacity(capacity),
                pending: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            all_processed: Condvar::new(),
            capacity,
        })
    }

    /// Maximum number of items the buffer may hold
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an item, suspending the caller until a slot is free
    pub fn put(&self, item: T) {
        let mut state = self.state.lock().unwrap();
        while state.items.len() >= self.capacity {
            state = self.not_full.wait(state).unwrap();
        }
        self.push(&mut state, item);
        drop(state);
        self.not_empty.notify_one();
    }

    /// Append an item, suspending the caller up to `timeout` for a free slot
    ///
    /// Fails with [`BufferError::Full`] when no slot frees within `timeout`;
    /// the item is discarded on failure.
    pub fn put_timeout(&self, item: T, timeout: Duration) -> BufferResult<()> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        while state.items.len() >= self.capacity {
            let now = Instant::now();
            if now >= deadline {
                return Err(BufferError::Full {
                    capacity: self.capacity,
                });
            }
            let (guard, _) = self.not_full.wait_timeout(state, deadline - now).unwrap();
            state = guard;
        }
        self.push(&mut state, item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Append an item without blocking
    ///
    /// Fails immediately with [`BufferError::Full`] when the buffer is at
    /// capacity; the item is discarded on failure.
    pub fn try_put(&self, item: T) -> BufferResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.items.len() >= self.capacity {
            return Err(BufferError::Full {
                capacity: self.capacity,
            });
        }
        self.push(&mut state, item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the oldest item, suspending until one is available
    pub fn get(&self) -> T {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return item;
            }
            state = self.not_empty.wait(state).unwrap();
        }
    }

    /// Remove and return the oldest item, suspending up to `timeout`
    ///
    /// Fails with [`BufferError::Empty`] when no item arrives within
    /// `timeout`. A timeout is the expected idle outcome for polling
    /// consumers, not a fault.
    pub fn get_timeout(&self, timeout: Duration) -> BufferResult<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Ok(item);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(BufferError::Empty);
            }
            let (guard, _) = self.not_empty.wait_timeout(state, deadline - now).unwrap();
            state = guard;
        }
    }

    /// Remove and return the oldest item without blocking
    ///
    /// Fails immediately with [`BufferError::Empty`] when the buffer holds
    /// no items.
    pub fn try_get(&self) -> BufferResult<T> {
        let mut state = self.state.lock().unwrap();
        match state.items.pop_front() {
            Some(item) => {
                drop(state);
                self.not_full.notify_one();
                Ok(item)
            }
            None => Err(BufferError::Empty),
        }
    }

    /// Current number of items (snapshot, approximate under concurrent mutation)
    pub fn size(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// Whether the buffer currently holds no items (snapshot)
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().items.is_empty()
    }

    /// Whether the buffer is currently at capacity (snapshot)
    pub fn is_full(&self) -> bool {
        self.state.lock().unwrap().items.len() >= self.capacity
    }

    /// Number of items put but not yet marked processed (snapshot)
    pub fn pending(&self) -> u64 {
        self.state.lock().unwrap().pending
    }

    /// Record completion of one previously retrieved item
    ///
    /// Decrements the pending counter; when it reaches zero, wakes every
    /// [`BoundedBuffer::await_all_processed`] waiter.
    pub fn mark_processed(&self) {
        let mut state = self.state.lock().unwrap();
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            drop(state);
            self.all_processed.notify_all();
        }
    }

    /// Block until every item put so far has been marked processed
    ///
    /// With `Some(timeout)` the wait is bounded; returns `true` when the
    /// pending counter reached zero and `false` when the deadline fired
    /// first.
    pub fn await_all_processed(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.state.lock().unwrap();
        while state.pending > 0 {
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    let (guard, _) = self
                        .all_processed
                        .wait_timeout(state, deadline - now)
                        .unwrap();
                    state = guard;
                }
                None => {
                    state = self.all_processed.wait(state).unwrap();
                }
            }
        }
        true
    }

    fn push(&self, state: &mut BufferState<T>, item: T) {
        state.items.push_back(item);
        state.pending += 1;
    }
}

use super::RingError;
use crate::ring::RingBuffer;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct State {
    ring: RingBuffer,
    closed: bool,
    sealed: bool,
}

/// The one lock-guarded owner of a [`RingBuffer`], shared by the producer and
/// consumer through an `Arc`.
///
/// A single condition variable is signalled on every append, removal and
/// state change. The producer waits on it while the ring lacks space for its
/// chunk, the consumer while the ring is empty.
///
/// Shutdown has two steps. [`close`](Self::close) asks both tasks to stop:
/// waits for space and pauses return early. [`seal`](Self::seal) marks that
/// no further appends will arrive, after which the consumer drains what is
/// left and stops.
pub struct SharedRing {
    state: Mutex<State>,
    changed: Condvar,
}

/// A copy of the ring state taken while holding the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSnapshot {
    pub capacity: usize,
    pub read_offset: usize,
    pub len: usize,
    pub storage: Vec<u8>,
}

impl RingSnapshot {
    /// Checks the occupancy bounds and that every free slot is zeroed.
    pub fn is_consistent(&self) -> bool {
        if self.len > self.capacity
            || self.read_offset >= self.capacity
            || self.storage.len() != self.capacity
        {
            return false;
        }

        (self.len..self.capacity)
            .map(|i| (self.read_offset + i) % self.capacity)
            .all(|slot| self.storage[slot] == 0)
    }
}

impl SharedRing {
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Ok(Self::from_ring(RingBuffer::new(capacity)?))
    }

    pub fn from_ring(ring: RingBuffer) -> Self {
        Self {
            state: Mutex::new(State {
                ring,
                closed: false,
                sealed: false,
            }),
            changed: Condvar::new(),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until `len` bytes are free.
    ///
    /// Only the producer adds data, so the space stays free until it appends.
    pub fn wait_for_space(&self, len: usize) -> Result<(), RingError> {
        let state = self.lock();
        if len > state.ring.capacity() {
            return Err(RingError::InsufficientSpace {
                required: len,
                available: state.ring.free(),
            });
        }

        let state = self
            .changed
            .wait_while(state, |s| !s.closed && s.ring.free() < len)
            .unwrap_or_else(PoisonError::into_inner);

        if state.closed {
            return Err(RingError::Closed);
        }
        Ok(())
    }

    pub fn append(&self, chunk: &[u8]) -> Result<usize, RingError> {
        let mut state = self.lock();
        state.ring.append(chunk)?;
        let len = state.ring.len();
        drop(state);

        self.changed.notify_all();
        Ok(len)
    }

    /// Removes a chunk whose length is chosen by `pick`.
    ///
    /// While the ring holds data, a pick larger than the occupied length is
    /// discarded and `pick` is called again after briefly releasing the lock.
    /// Blocks while the ring is empty; returns [`RingError::Closed`] once it
    /// is both empty and sealed.
    pub fn remove_with<F>(&self, mut pick: F) -> Result<Vec<u8>, RingError>
    where
        F: FnMut() -> usize,
    {
        let mut state = self.lock();
        loop {
            state = self
                .changed
                .wait_while(state, |s| !s.sealed && s.ring.is_empty())
                .unwrap_or_else(PoisonError::into_inner);

            if state.ring.is_empty() {
                return Err(RingError::Closed);
            }

            match state.ring.remove(pick()) {
                Ok(bytes) => {
                    drop(state);
                    self.changed.notify_all();
                    return Ok(bytes);
                }
                Err(RingError::InsufficientData { .. }) => {
                    drop(state);
                    state = self.lock();
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Sleeps for up to `duration`, returning early once the ring is closed.
    ///
    /// Returns `false` if the ring is closed.
    pub fn pause(&self, duration: Duration) -> bool {
        let state = self.lock();
        if state.closed || duration.is_zero() {
            return !state.closed;
        }

        let (state, _) = self
            .changed
            .wait_timeout_while(state, duration, |s| !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        !state.closed
    }

    pub fn close(&self) {
        self.lock().closed = true;
        self.changed.notify_all();
    }

    /// Closes the ring and records that the producer is gone.
    pub fn seal(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.sealed = true;
        drop(state);
        self.changed.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn is_sealed(&self) -> bool {
        self.lock().sealed
    }

    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().ring.capacity()
    }

    pub fn snapshot(&self) -> RingSnapshot {
        let state = self.lock();
        RingSnapshot {
            capacity: state.ring.capacity(),
            read_offset: state.ring.read_offset(),
            len: state.ring.len(),
            storage: state.ring.storage().to_vec(),
        }
    }
}

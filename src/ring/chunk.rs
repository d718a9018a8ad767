use super::RingError;
use crate::ring::RingBuffer;

impl RingBuffer {
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::InvalidCapacity {
                capacity,
                reason: "must be greater than zero",
            });
        }

        Ok(Self {
            storage: vec![0; capacity].into_boxed_slice(),
            capacity,
            read_offset: 0,
            len: 0,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn free(&self) -> usize {
        self.capacity - self.len
    }

    #[inline(always)]
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Raw view of the backing storage, including free slots.
    pub fn storage(&self) -> &[u8] {
        &self.storage
    }

    /// Appends the whole chunk or nothing.
    #[inline]
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), RingError> {
        let available = self.free();
        if chunk.len() > available {
            return Err(RingError::InsufficientSpace {
                required: chunk.len(),
                available,
            });
        }
        if chunk.is_empty() {
            return Ok(());
        }

        let start = (self.read_offset + self.len) % self.capacity;
        let contiguous = self.capacity - start;

        if chunk.len() <= contiguous {
            self.storage[start..start + chunk.len()].copy_from_slice(chunk);
        } else {
            let (first, second) = chunk.split_at(contiguous);
            self.storage[start..].copy_from_slice(first);
            self.storage[..second.len()].copy_from_slice(second);
        }

        self.len += chunk.len();
        Ok(())
    }

    /// Removes `n` bytes from the front, clearing the slots they occupied.
    #[inline]
    pub fn remove(&mut self, n: usize) -> Result<Vec<u8>, RingError> {
        if n > self.len {
            return Err(RingError::InsufficientData {
                requested: n,
                occupied: self.len,
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let start = self.read_offset;
        let contiguous = self.capacity - start;
        let mut out = Vec::with_capacity(n);

        if n <= contiguous {
            let slots = &mut self.storage[start..start + n];
            out.extend_from_slice(slots);
            slots.fill(0);
        } else {
            let head = &mut self.storage[start..];
            out.extend_from_slice(head);
            head.fill(0);

            let tail = &mut self.storage[..n - contiguous];
            out.extend_from_slice(tail);
            tail.fill(0);
        }

        self.read_offset = (start + n) % self.capacity;
        self.len -= n;
        Ok(out)
    }
}

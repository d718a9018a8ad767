use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Draws chunk lengths in `[1, max_chunk)` and alphanumeric chunk bodies.
pub struct ChunkGenerator {
    rng: StdRng,
    max_chunk: usize,
}

impl ChunkGenerator {
    /// # Panics
    /// Panics if `max_chunk < 2`, which leaves no non-zero length to draw.
    pub fn new(seed: Option<u64>, max_chunk: usize) -> Self {
        assert!(max_chunk >= 2, "max_chunk must be at least 2");
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, max_chunk }
    }

    /// Zero is redrawn, never returned.
    #[inline]
    pub fn next_len(&mut self) -> usize {
        loop {
            let len = self.rng.gen_range(0..self.max_chunk);
            if len != 0 {
                return len;
            }
        }
    }

    pub fn fill(&mut self, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())])
            .collect()
    }

    pub fn next_chunk(&mut self) -> Vec<u8> {
        let len = self.next_len();
        self.fill(len)
    }
}

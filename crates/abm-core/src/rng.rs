/// Small deterministic generator for per-step random choices.
///
/// Splitmix64 under the hood: fast, seedable, reproducible across runs.
/// Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRng {
    state: u64,
}

impl StepRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform index into a slice of length `len`. Returns 0 for empty or
    /// single-element slices.
    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }
}

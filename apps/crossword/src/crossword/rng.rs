//! Date-seeded linear-congruential generator.
//!
//! Every generation call owns one `SeededRng`. The same date string always
//! yields the same sequence of draws, which fixes the grid shape and the
//! candidate shuffle order for that day.

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233280;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds the generator from a date string such as `"2024-01-01"`.
    pub fn from_date(date: &str) -> Self {
        Self::new(u64::from(hash_date(date)))
    }

    /// Next draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state.wrapping_mul(MULTIPLIER) + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "gen_index called with empty range");
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Fisher-Yates shuffle driven by this generator.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Polynomial rolling hash (`h = h*31 + unit`) over UTF-16 code units,
/// wrapped to 32 bits, absolute value.
pub fn hash_date(date: &str) -> u32 {
    let hash = date
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

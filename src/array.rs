//! Random array generation.
//!
//! Every program owns one `RandomSource`, seeded once when it starts. Nothing here
//! touches process-wide random state.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{SortitError, SortitResult};
use crate::logging::LogLevel;
use crate::sortit_log;

/// An inclusive range o' values tae draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    low: i64,
    high: i64,
}

impl ValueRange {
    /// `[0, 300)`: what the bubble sort program draws from.
    pub const UNDER_300: ValueRange = ValueRange { low: 0, high: 299 };

    /// `1..=200`: what the merge an' quick sort programs draw from.
    pub const ONE_TO_200: ValueRange = ValueRange { low: 1, high: 200 };

    pub fn new(low: i64, high: i64) -> SortitResult<Self> {
        if low > high {
            return Err(SortitError::InvalidBound { low, high });
        }
        Ok(ValueRange { low, high })
    }

    /// The half-open range `[0, bound)`.
    pub fn below(bound: i64) -> SortitResult<Self> {
        if bound <= 0 {
            return Err(SortitError::InvalidBound {
                low: 0,
                high: bound.saturating_sub(1),
            });
        }
        Ok(ValueRange {
            low: 0,
            high: bound - 1,
        })
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    #[cfg(test)]
    pub fn contains(&self, value: i64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.low, self.high)
    }
}

/// A seeded pseudo-random stream.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: StdRng,
}

impl RandomSource {
    /// Seed fae the wall clock. Done once; the source is never reseeded.
    pub fn from_clock() -> Self {
        let now = chrono::Utc::now();
        let seed = now
            .timestamp_nanos_opt()
            .map(|nanos| nanos as u64)
            .unwrap_or_else(|| now.timestamp() as u64);
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomSource {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `len` values, each drawn uniformly from `[0, bound)`.
    pub fn generate(&mut self, len: usize, bound: i64) -> SortitResult<Vec<i64>> {
        let range = ValueRange::below(bound)?;
        self.generate_in(len, range)
    }

    /// `len` values, each drawn uniformly from the inclusive `range`.
    pub fn generate_in(&mut self, len: usize, range: ValueRange) -> SortitResult<Vec<i64>> {
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|_| SortitError::AllocationFailed { len })?;

        for _ in 0..len {
            values.push(self.rng.gen_range(range.low..=range.high));
        }

        sortit_log!(
            LogLevel::Mutter,
            "sortit::array",
            "generated array",
            len = len,
            range = range.to_string(),
            seed = self.seed,
        );
        Ok(values)
    }
}

//! The sorting algorithms.
//!
//! Each one sorts a slice in place an' reports its progress tae an [`Observer`].

pub mod bubble;
pub mod merge;
pub mod quick;

use std::fmt;
use std::str::FromStr;

use crate::error::SortitError;
use crate::logging::LogLevel;
use crate::sortit_log;
use crate::trace::Observer;

pub use bubble::bubble_sort;
pub use merge::merge_sort;
pub use quick::{partition, pick_median_of_three, quick_sort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Algorithm {
    /// Adjacent swaps, snapshot efter every swap
    Bubble,
    /// Divide an' conquer, snapshot efter every merge
    Merge,
    /// Median-o'-three quicksort, snapshot as each call finishes
    Quick,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bubble, Algorithm::Merge, Algorithm::Quick];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SortitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bubble" | "bubble_sort" | "bubblesort" => Ok(Algorithm::Bubble),
            "merge" | "merge_sort" | "mergesort" => Ok(Algorithm::Merge),
            "quick" | "quick_sort" | "quicksort" => Ok(Algorithm::Quick),
            _ => Err(SortitError::UnkentAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Sort `items` wi' the chosen algorithm.
pub fn sort<T, O>(algorithm: Algorithm, items: &mut [T], observer: &mut O)
where
    T: PartialOrd + Clone,
    O: Observer<T> + ?Sized,
{
    sortit_log!(
        LogLevel::Mutter,
        "sortit::sort",
        "sort started",
        algorithm = algorithm.name(),
        len = items.len(),
    );

    match algorithm {
        Algorithm::Bubble => bubble_sort(items, observer),
        Algorithm::Merge => merge_sort(items, observer),
        Algorithm::Quick => quick_sort(items, observer),
    }

    sortit_log!(
        LogLevel::Mutter,
        "sortit::sort",
        "sort finished",
        algorithm = algorithm.name(),
        len = items.len(),
    );
}

pub fn is_sorted<T: PartialOrd>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0] <= w[1])
}

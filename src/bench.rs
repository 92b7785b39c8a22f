//! Race the algorithms against each other on the same array.

use std::time::Instant;

use serde::Serialize;

use crate::array::{RandomSource, ValueRange};
use crate::error::SortitResult;
use crate::sort::{is_sorted, sort, Algorithm};
use crate::trace::Stats;

pub const DEFAULT_BENCH_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchResult {
    pub algorithm: String,
    pub len: usize,
    #[serde(flatten)]
    pub stats: Stats,
    pub elapsed_us: u64,
    pub sorted: bool,
}

/// Sort a copy o' one seeded array wi' each algorithm in turn, countin' as we go.
pub fn bench(
    algorithms: &[Algorithm],
    size: usize,
    range: ValueRange,
    source: &mut RandomSource,
) -> SortitResult<Vec<BenchResult>> {
    let original = source.generate_in(size, range)?;

    let results = algorithms
        .iter()
        .map(|&algorithm| {
            let mut items = original.clone();
            let mut stats = Stats::default();
            let start = Instant::now();
            sort(algorithm, &mut items, &mut stats);
            let elapsed = start.elapsed();
            BenchResult {
                algorithm: algorithm.to_string(),
                len: items.len(),
                stats,
                elapsed_us: elapsed.as_micros() as u64,
                sorted: is_sorted(&items),
            }
        })
        .collect();
    Ok(results)
}

pub fn format_table(results: &[BenchResult]) -> String {
    let mut out = format!(
        "{:<8} {:>8} {:>12} {:>10} {:>10} {:>12} {:>7}\n",
        "sort", "len", "comparisons", "swaps", "snapshots", "elapsed(us)", "sorted"
    );
    for r in results {
        out.push_str(&format!(
            "{:<8} {:>8} {:>12} {:>10} {:>10} {:>12} {:>7}\n",
            r.algorithm,
            r.len,
            r.stats.comparisons,
            r.stats.swaps,
            r.stats.snapshots,
            r.elapsed_us,
            if r.sorted { "aye" } else { "naw" }
        ));
    }
    out
}

//! sortit - wee sortin' programs
//!
//! Watch yer numbers get sortit, one snapshot at a time!
//!
//! This crate provides bubble sort, merge sort an' median-o'-three quicksort over
//! slices, a seeded random array generator, an' observers that print or record
//! every intermediate state the algorithms show.

pub mod array;
pub mod bench;
pub mod config;
pub mod error;
pub mod logging;
pub mod sort;
pub mod trace;

// Re-export commonly used types
pub use array::{RandomSource, ValueRange};
pub use config::{run, RunConfig, RunReport};
pub use error::{SortitError, SortitResult};
pub use sort::{is_sorted, sort, Algorithm};
pub use trace::{NoTrace, Observer, OutputFormat, Printer, Recorder, Stats, TraceMode};

/// Sort a copy o' `values` an' return it wi' every snapshot the algorithm showed
///
/// # Example
/// ```
/// use sortit::{sort_with_snapshots, Algorithm};
///
/// let (sorted, snapshots) = sort_with_snapshots(Algorithm::Bubble, &[2, 1]);
/// assert_eq!(sorted, vec![1, 2]);
/// assert_eq!(snapshots, vec![vec![1, 2]]);
/// ```
pub fn sort_with_snapshots(algorithm: Algorithm, values: &[i64]) -> (Vec<i64>, Vec<Vec<i64>>) {
    let mut items = values.to_vec();
    let mut recorder = Recorder::new();
    sort(algorithm, &mut items, &mut recorder);
    (items, recorder.snapshots)
}

/// Sort a copy o' `values` an' capture the printed output
///
/// The first line is the startin' array, followed by one line per snapshot.
pub fn sort_to_string(
    algorithm: Algorithm,
    values: &[i64],
    format: OutputFormat,
) -> SortitResult<String> {
    let mut items = values.to_vec();
    let mut printer = Printer::new(Vec::new(), format);
    printer.print(&items);
    sort(algorithm, &mut items, &mut printer);
    let bytes = printer.finish()?;
    String::from_utf8(bytes).map_err(|e| SortitError::Io(e.to_string()))
}

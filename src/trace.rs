//! Watchin' the sorts work.
//!
//! Every algorithm reports tae an [`Observer`]: a full-array snapshot at the points
//! the algorithm defines, plus finer events (compares, swaps, partitions, merges)
//! that only the verbose tracer an' the statistics counter care aboot.

use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;

use crate::error::{SortitError, SortitResult};

/// How much o' the sort tae show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceMode {
    /// Only the starting array an' the final result
    Off,
    /// A snapshot line every time the algorithm emits one
    #[default]
    Snapshots,
    /// Snapshots, plus every compare, swap, partition an' merge on stderr
    Verbose,
}

/// How snapshot lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Space-separated values, one line per snapshot
    #[default]
    Text,
    /// One JSON object per line: {"step":N,"array":[...]}
    Json,
}

pub trait Observer<T> {
    /// The whole array, at a point the algorithm chooses tae show.
    fn snapshot(&mut self, items: &[T]);

    fn compare(&mut self, _lhs: &T, _rhs: &T) {}

    fn swap(&mut self, _i: usize, _j: usize) {}

    /// `pivot` has landed at `index` within `[left, right]`.
    fn partition(&mut self, _left: usize, _right: usize, _index: usize, _pivot: &T) {}

    fn merge(&mut self, _left: usize, _middle: usize, _right: usize) {}

    /// A recursive call on `[left, right]` has started.
    fn enter(&mut self, _left: usize, _right: usize) {}

    fn leave(&mut self) {}
}

impl<T, O: Observer<T> + ?Sized> Observer<T> for &mut O {
    fn snapshot(&mut self, items: &[T]) {
        (**self).snapshot(items)
    }

    fn compare(&mut self, lhs: &T, rhs: &T) {
        (**self).compare(lhs, rhs)
    }

    fn swap(&mut self, i: usize, j: usize) {
        (**self).swap(i, j)
    }

    fn partition(&mut self, left: usize, right: usize, index: usize, pivot: &T) {
        (**self).partition(left, right, index, pivot)
    }

    fn merge(&mut self, left: usize, middle: usize, right: usize) {
        (**self).merge(left, middle, right)
    }

    fn enter(&mut self, left: usize, right: usize) {
        (**self).enter(left, right)
    }

    fn leave(&mut self) {
        (**self).leave()
    }
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl<T> Observer<T> for NoTrace {
    fn snapshot(&mut self, _items: &[T]) {}
}

/// Keeps every snapshot in memory.
#[derive(Debug, Clone)]
pub struct Recorder<T> {
    pub snapshots: Vec<Vec<T>>,
}

impl<T> Recorder<T> {
    pub fn new() -> Self {
        Recorder {
            snapshots: Vec::new(),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Observer<T> for Recorder<T> {
    fn snapshot(&mut self, items: &[T]) {
        self.snapshots.push(items.to_vec());
    }
}

/// Counts events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub comparisons: usize,
    pub swaps: usize,
    pub partitions: usize,
    pub merges: usize,
    pub snapshots: usize,
}

impl<T> Observer<T> for Stats {
    fn snapshot(&mut self, _items: &[T]) {
        self.snapshots += 1;
    }

    fn compare(&mut self, _lhs: &T, _rhs: &T) {
        self.comparisons += 1;
    }

    fn swap(&mut self, _i: usize, _j: usize) {
        self.swaps += 1;
    }

    fn partition(&mut self, _left: usize, _right: usize, _index: usize, _pivot: &T) {
        self.partitions += 1;
    }

    fn merge(&mut self, _left: usize, _middle: usize, _right: usize) {
        self.merges += 1;
    }
}

/// Forwards every event tae two observers.
#[derive(Debug)]
pub struct Tee<A, B>(pub A, pub B);

impl<T, A: Observer<T>, B: Observer<T>> Observer<T> for Tee<A, B> {
    fn snapshot(&mut self, items: &[T]) {
        self.0.snapshot(items);
        self.1.snapshot(items);
    }

    fn compare(&mut self, lhs: &T, rhs: &T) {
        self.0.compare(lhs, rhs);
        self.1.compare(lhs, rhs);
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.0.swap(i, j);
        self.1.swap(i, j);
    }

    fn partition(&mut self, left: usize, right: usize, index: usize, pivot: &T) {
        self.0.partition(left, right, index, pivot);
        self.1.partition(left, right, index, pivot);
    }

    fn merge(&mut self, left: usize, middle: usize, right: usize) {
        self.0.merge(left, middle, right);
        self.1.merge(left, middle, right);
    }

    fn enter(&mut self, left: usize, right: usize) {
        self.0.enter(left, right);
        self.1.enter(left, right);
    }

    fn leave(&mut self) {
        self.0.leave();
        self.1.leave();
    }
}

#[derive(Serialize)]
struct SnapshotLine<'a, T> {
    step: usize,
    array: &'a [T],
}

/// Writes snapshot lines. The first write error is kept an' handed back by `finish`.
pub struct Printer<W: Write> {
    writer: W,
    format: OutputFormat,
    step: usize,
    error: Option<SortitError>,
}

impl<W: Write> Printer<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Printer {
            writer,
            format,
            step: 0,
            error: None,
        }
    }

    /// Write one line fer `items`, regardless o' which algorithm is runnin'.
    pub fn print<T: Display + Serialize>(&mut self, items: &[T]) {
        if self.error.is_some() {
            return;
        }
        let written = match self.format {
            OutputFormat::Text => write_text_line(&mut self.writer, items),
            OutputFormat::Json => {
                let line = SnapshotLine {
                    step: self.step,
                    array: items,
                };
                serde_json::to_string(&line)
                    .map_err(io::Error::from)
                    .and_then(|json| writeln!(self.writer, "{}", json))
            }
        };
        if let Err(e) = written {
            self.error = Some(e.into());
        }
        self.step += 1;
    }

    pub fn lines_written(&self) -> usize {
        self.step
    }

    pub fn finish(mut self) -> SortitResult<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn write_text_line<W: Write, T: Display>(writer: &mut W, items: &[T]) -> io::Result<()> {
    for item in items {
        write!(writer, "{} ", item)?;
    }
    writeln!(writer)
}

impl<W: Write, T: Display + Serialize> Observer<T> for Printer<W> {
    fn snapshot(&mut self, items: &[T]) {
        self.print(items);
    }
}

/// Step-by-step commentary fer `TraceMode::Verbose`, indented by recursion depth.
pub struct Tracer<W: Write> {
    writer: W,
    color: bool,
    depth: usize,
}

impl<W: Write> Tracer<W> {
    pub fn new(writer: W, color: bool) -> Self {
        Tracer {
            writer,
            color,
            depth: 0,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, code: &str, msg: &str) {
        let indent = "  ".repeat(self.depth);
        // Trace output is best-effort; a closed stderr shouldnae stop the sort.
        let _ = if self.color {
            writeln!(self.writer, "\x1b[{}m{}{}\x1b[0m", code, indent, msg)
        } else {
            writeln!(self.writer, "{}{}", indent, msg)
        };
    }
}

impl<W: Write, T: Display> Observer<T> for Tracer<W> {
    fn snapshot(&mut self, _items: &[T]) {}

    fn compare(&mut self, lhs: &T, rhs: &T) {
        self.line("36", &format!("compare {} wi' {}", lhs, rhs));
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.line("33", &format!("swap [{}] <-> [{}]", i, j));
    }

    fn partition(&mut self, left: usize, right: usize, index: usize, pivot: &T) {
        self.line(
            "35",
            &format!("partition [{}..={}]: pivot {} lands at [{}]", left, right, pivot, index),
        );
    }

    fn merge(&mut self, left: usize, middle: usize, right: usize) {
        self.line(
            "32",
            &format!("merge [{}..={}] wi' [{}..={}]", left, middle, middle + 1, right),
        );
    }

    fn enter(&mut self, left: usize, right: usize) {
        self.line("34", &format!("sort [{}..={}]", left, right));
        self.depth += 1;
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe's burst"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_text_lines_have_trailing_space_and_newline() {
        let mut printer = Printer::new(Vec::new(), OutputFormat::Text);
        printer.print(&[5i64, 3, 8, 1]);
        printer.print::<i64>(&[]);
        let out = String::from_utf8(printer.finish().unwrap()).unwrap();
        assert_eq!(out, "5 3 8 1 \n\n");
    }

    #[test]
    fn test_json_lines_count_steps() {
        let mut printer = Printer::new(Vec::new(), OutputFormat::Json);
        printer.print(&[2i64, 1]);
        Observer::snapshot(&mut printer, &[1i64, 2]);
        assert_eq!(printer.lines_written(), 2);
        let out = String::from_utf8(printer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "{\"step\":0,\"array\":[2,1]}\n{\"step\":1,\"array\":[1,2]}\n"
        );
    }

    #[test]
    fn test_printer_keeps_first_error() {
        let mut printer = Printer::new(BrokenPipe, OutputFormat::Text);
        printer.print(&[1i64]);
        printer.print(&[2i64]);
        let err = printer.finish().err().unwrap();
        assert!(matches!(err, SortitError::Io(msg) if msg.contains("burst")));
    }

    #[test]
    fn test_stats_and_recorder_through_tee() {
        let mut tee = Tee(Stats::default(), Recorder::new());
        tee.compare(&1, &2);
        tee.swap(0, 1);
        tee.partition(0, 3, 1, &7);
        tee.merge(0, 1, 3);
        tee.snapshot(&[1, 2]);
        let Tee(stats, recorder) = tee;
        assert_eq!(
            stats,
            Stats {
                comparisons: 1,
                swaps: 1,
                partitions: 1,
                merges: 1,
                snapshots: 1,
            }
        );
        assert_eq!(recorder.snapshots, vec![vec![1, 2]]);
    }

    #[test]
    fn test_tracer_indents_by_depth() {
        let mut tracer = Tracer::new(Vec::new(), false);
        Observer::<i64>::enter(&mut tracer, 0, 3);
        Observer::<i64>::swap(&mut tracer, 0, 2);
        Observer::<i64>::leave(&mut tracer);
        Observer::<i64>::merge(&mut tracer, 0, 1, 3);
        let out = String::from_utf8(tracer.into_inner()).unwrap();
        assert_eq!(
            out,
            "sort [0..=3]\n  swap [0] <-> [2]\nmerge [0..=1] wi' [2..=3]\n"
        );
    }

    #[test]
    fn test_tracer_colour_codes() {
        let mut tracer = Tracer::new(Vec::new(), true);
        tracer.compare(&4i64, &2i64);
        let out = String::from_utf8(tracer.into_inner()).unwrap();
        assert_eq!(out, "\x1b[36mcompare 4 wi' 2\x1b[0m\n");
    }
}

//! Run configuration an' the end-to-end program flow.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use crate::array::{RandomSource, ValueRange};
use crate::error::{SortitError, SortitResult};
use crate::logging::LogLevel;
use crate::sort::{sort, Algorithm};
use crate::sortit_log;
use crate::trace::{OutputFormat, Printer, Stats, Tee, TraceMode, Tracer};

pub const LENGTH_PROMPT: &str = "Enter the array length: ";

/// Everything one sortin' program needs tae ken.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub algorithm: Algorithm,
    /// `None` means ask on stdin.
    pub size: Option<usize>,
    pub range: ValueRange,
    /// `None` means seed fae the clock.
    pub seed: Option<u64>,
    /// Sort these instead o' generatin' an array.
    pub values: Option<Vec<i64>>,
    pub output: OutputFormat,
    pub trace: TraceMode,
    pub stats: bool,
    pub color: bool,
}

impl RunConfig {
    pub const DEFAULT_SIZE: usize = 50;

    /// Per-algorithm defaults: bubble sort asks fer its length an'
    /// draws fae `[0, 300)`, the others sort 50 values fae `1..=200`.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        let (size, range) = match algorithm {
            Algorithm::Bubble => (None, ValueRange::UNDER_300),
            Algorithm::Merge | Algorithm::Quick => {
                (Some(Self::DEFAULT_SIZE), ValueRange::ONE_TO_200)
            }
        };
        RunConfig {
            algorithm,
            size,
            range,
            seed: None,
            values: None,
            output: OutputFormat::Text,
            trace: TraceMode::Snapshots,
            stats: false,
            color: false,
        }
    }

    /// Override the range wi' CLI `--low`/`--high`, keepin' whichever end isnae given.
    pub fn with_bounds(mut self, low: Option<i64>, high: Option<i64>) -> SortitResult<Self> {
        if low.is_some() || high.is_some() {
            self.range = ValueRange::new(
                low.unwrap_or(self.range.low()),
                high.unwrap_or(self.range.high()),
            )?;
        }
        Ok(self)
    }

    /// Does this run need tae ask fer a length?
    pub fn needs_prompt(&self) -> bool {
        self.values.is_none() && self.size.is_none()
    }
}

/// Parse a length typed at the prompt.
pub fn parse_length(input: &str) -> SortitResult<usize> {
    let trimmed = input.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| SortitError::InvalidLength {
            input: trimmed.to_string(),
        })
}

/// Parse `5,3,8,1`. Empty items (a trailin' comma, say) are skipped.
pub fn parse_values(input: &str) -> SortitResult<Vec<i64>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| SortitError::InvalidValue {
                value: s.to_string(),
            })
        })
        .collect()
}

/// Print the prompt an' read one line.
pub fn prompt_length<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> SortitResult<usize> {
    write!(output, "{}", LENGTH_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_length(&line)
}

/// Whit a finished run looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub sorted: Vec<i64>,
    pub stats: Stats,
    pub seed: Option<u64>,
    pub elapsed: Duration,
}

/// Run one sortin' program end tae end: build the array, print it, sort it wi'
/// snapshots, an' (if asked) report statistics on `errors`.
pub fn run<R, W, E>(
    config: &RunConfig,
    input: &mut R,
    output: &mut W,
    errors: &mut E,
) -> SortitResult<RunReport>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let (mut array, seed) = match &config.values {
        Some(values) => (values.clone(), None),
        None => {
            // JSON output keeps the prompt off stdout
            let size = match (config.size, config.output) {
                (Some(size), _) => size,
                (None, OutputFormat::Text) => prompt_length(input, output)?,
                (None, OutputFormat::Json) => prompt_length(input, errors)?,
            };
            let mut source = match config.seed {
                Some(seed) => RandomSource::with_seed(seed),
                None => RandomSource::from_clock(),
            };
            let array = source.generate_in(size, config.range)?;
            (array, Some(source.seed()))
        }
    };

    sortit_log!(
        LogLevel::Blether,
        "sortit::run",
        "sortin'",
        algorithm = config.algorithm.name(),
        len = array.len(),
        seed = seed,
    );

    let mut printer = Printer::new(&mut *output, config.output);
    printer.print(&array);

    let mut stats = Stats::default();
    let started = Instant::now();
    match config.trace {
        TraceMode::Off => sort(config.algorithm, &mut array, &mut stats),
        TraceMode::Snapshots => sort(
            config.algorithm,
            &mut array,
            &mut Tee(&mut printer, &mut stats),
        ),
        TraceMode::Verbose => {
            let tracer = Tracer::new(&mut *errors, config.color);
            sort(
                config.algorithm,
                &mut array,
                &mut Tee(Tee(&mut printer, &mut stats), tracer),
            );
        }
    }
    let elapsed = started.elapsed();

    if config.trace == TraceMode::Off {
        printer.print(&array);
    }
    let lines = printer.lines_written();
    printer.finish()?;
    sortit_log!(
        LogLevel::Mutter,
        "sortit::run",
        "snapshots written",
        lines = lines,
        format = format!("{:?}", config.output),
    );

    let report = RunReport {
        sorted: array,
        stats,
        seed,
        elapsed,
    };
    if config.stats {
        writeln!(errors, "{}", format_stats(config.algorithm, &report))?;
    }
    Ok(report)
}

pub fn format_stats(algorithm: Algorithm, report: &RunReport) -> String {
    let seed = report
        .seed
        .map(|s| format!(", seed {}", s))
        .unwrap_or_default();
    format!(
        "{}: {} elements, {} comparisons, {} swaps, {} snapshots in {:?}{}",
        algorithm,
        report.sorted.len(),
        report.stats.comparisons,
        report.stats.swaps,
        report.stats.snapshots,
        report.elapsed,
        seed
    )
}

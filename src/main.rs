use std::io::{self, BufWriter};
use std::process;

use clap::{Args, Parser, Subcommand};
use colored::*;

use sortit::array::{RandomSource, ValueRange};
use sortit::bench::{bench, format_table, DEFAULT_BENCH_SIZE};
use sortit::config::{format_stats, parse_values, run, RunConfig};
use sortit::error::{get_error_suggestion, random_scots_exclamation};
use sortit::logging::{self, LogLevel};
use sortit::{sortit_log, Algorithm, OutputFormat, SortitError, SortitResult, TraceMode};

/// Initialize a panic hook that owns up tae the crash
#[cfg(not(coverage))]
fn setup_crash_handlers() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        eprintln!("\n{}", "Och noo! sortit crashed!".red().bold());
        if let Some(location) = panic_info.location() {
            eprintln!(
                "{}",
                format!("Panic at {}:{}", location.file(), location.line()).red()
            );
        }
        eprintln!(
            "{}",
            "This shouldnae hae happened! Please report this issue.".yellow()
        );
        default_panic(panic_info);
    }));
}

/// No-op under source-based coverage: we don't deliberately test panic-reporting UX.
#[cfg(coverage)]
fn setup_crash_handlers() {}

/// sortit - watch yer numbers get sortit
#[derive(Parser)]
#[command(name = "sortit")]
#[command(author = "Arthur")]
#[command(version = "0.1.0")]
#[command(about = "Wee sorting programs - watch yer numbers get sortit, one snapshot at a time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bubble sort: snapshot efter every swap (asks fer a length if --size is left oot)
    Bubble(SortArgs),

    /// Merge sort: snapshot efter every merge
    Merge(SortArgs),

    /// Quicksort wi' a median-o'-three pivot: snapshot as each call finishes
    Quick(SortArgs),

    /// Race the algorithms on the same random array
    Bench {
        /// Number o' elements
        #[arg(short, long, default_value_t = DEFAULT_BENCH_SIZE)]
        size: usize,

        /// Seed fer a reproducible array
        #[arg(long)]
        seed: Option<u64>,

        /// Only run these algorithms (comma-separated)
        #[arg(long, value_enum, value_delimiter = ',')]
        only: Vec<Algorithm>,

        /// Table or JSON
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct SortArgs {
    /// Number o' elements tae generate
    #[arg(short, long)]
    size: Option<usize>,

    /// Seed fer a reproducible array
    #[arg(long)]
    seed: Option<u64>,

    /// Smallest value tae generate (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    low: Option<i64>,

    /// Largest value tae generate (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    high: Option<i64>,

    /// Sort these values instead o' random ones, e.g. 5,3,8,1
    #[arg(
        long,
        value_name = "LIST",
        allow_hyphen_values = true,
        conflicts_with_all = ["size", "seed", "low", "high"]
    )]
    values: Option<String>,

    /// Print only the startin' an' final arrays
    #[arg(short, long, conflicts_with = "trace")]
    quiet: bool,

    /// Show every compare, swap, partition an' merge on stderr
    #[arg(short, long)]
    trace: bool,

    /// Print comparison an' swap counts on stderr when done
    #[arg(long)]
    stats: bool,

    /// Snapshot line format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() {
    setup_crash_handlers();

    let cli = Cli::parse();

    if let Err(e) = logging::init_from_env() {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let result = match cli.command {
        Commands::Bubble(args) => sort_command(Algorithm::Bubble, args),
        Commands::Merge(args) => sort_command(Algorithm::Merge, args),
        Commands::Quick(args) => sort_command(Algorithm::Quick, args),
        Commands::Bench {
            size,
            seed,
            only,
            format,
        } => bench_command(size, seed, only, format),
    };

    if let Err(e) = result {
        report_error(&e);
        process::exit(1);
    }
}

fn report_error(e: &SortitError) {
    eprintln!("{}: {}", random_scots_exclamation().red().bold(), e);
    if let Some(hint) = get_error_suggestion(e) {
        eprintln!("{}", hint.yellow());
    }
}

fn build_config(algorithm: Algorithm, args: SortArgs) -> SortitResult<RunConfig> {
    let mut config = RunConfig::for_algorithm(algorithm).with_bounds(args.low, args.high)?;
    if args.size.is_some() {
        config.size = args.size;
    }
    config.seed = args.seed;
    config.values = args.values.as_deref().map(parse_values).transpose()?;
    config.output = args.format;
    config.trace = if args.quiet {
        TraceMode::Off
    } else if args.trace {
        TraceMode::Verbose
    } else {
        TraceMode::Snapshots
    };
    config.stats = args.stats;
    config.color = colored::control::SHOULD_COLORIZE.should_colorize();
    Ok(config)
}

fn sort_command(algorithm: Algorithm, args: SortArgs) -> SortitResult<()> {
    let config = build_config(algorithm, args)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = BufWriter::new(io::stdout().lock());
    let mut errors = io::stderr().lock();

    let report = run(&config, &mut input, &mut output, &mut errors)?;
    sortit_log!(
        LogLevel::Blether,
        "sortit::cli",
        format_stats(algorithm, &report),
    );
    Ok(())
}

fn bench_command(
    size: usize,
    seed: Option<u64>,
    only: Vec<Algorithm>,
    format: OutputFormat,
) -> SortitResult<()> {
    let algorithms = if only.is_empty() {
        Algorithm::ALL.to_vec()
    } else {
        only
    };
    let mut source = seed
        .map(RandomSource::with_seed)
        .unwrap_or_else(RandomSource::from_clock);

    let results = bench(&algorithms, size, ValueRange::ONE_TO_200, &mut source)?;

    match format {
        OutputFormat::Text => {
            println!(
                "{}",
                format!("Sortin' {} values (seed {})", size, source.seed())
                    .yellow()
                    .bold()
            );
            print!("{}", format_table(&results));
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string(&results).map_err(|e| SortitError::Io(e.to_string()))?;
            println!("{}", json);
        }
    }

    if results.iter().any(|r| !r.sorted) {
        eprintln!("{}", "Yin o' the sorts didnae sort!".red().bold());
    }
    Ok(())
}

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{SortitError, SortitResult};

/// Log levels, loudest first. `Wheesht` switches logging aff entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Wheesht = 0,
    Roar = 1,
    Holler = 2,
    Blether = 3,
    Mutter = 4,
    Whisper = 5,
}

impl LogLevel {
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Wheesht => "WHEESHT",
            LogLevel::Roar => "ROAR",
            LogLevel::Holler => "HOLLER",
            LogLevel::Blether => "BLETHER",
            LogLevel::Mutter => "MUTTER",
            LogLevel::Whisper => "WHISPER",
        }
    }

    /// Accepts the Scots names an' the usual English ones.
    pub fn parse_level(s: &str) -> Option<LogLevel> {
        match s.trim().to_lowercase().as_str() {
            "wheesht" | "off" | "none" => Some(LogLevel::Wheesht),
            "roar" | "error" => Some(LogLevel::Roar),
            "holler" | "warn" | "warning" => Some(LogLevel::Holler),
            "blether" | "info" => Some(LogLevel::Blether),
            "mutter" | "debug" => Some(LogLevel::Mutter),
            "whisper" | "trace" => Some(LogLevel::Whisper),
            _ => None,
        }
    }

    fn from_u8(raw: u8) -> LogLevel {
        match raw {
            0 => LogLevel::Wheesht,
            1 => LogLevel::Roar,
            2 => LogLevel::Holler,
            3 => LogLevel::Blether,
            4 => LogLevel::Mutter,
            5 => LogLevel::Whisper,
            _ => DEFAULT_LEVEL,
        }
    }
}

/// Quiet by default so stdout stays a clean snapshot stream.
const DEFAULT_LEVEL: LogLevel = LogLevel::Holler;

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_LEVEL as u8);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Text,
    Json,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogFilter {
    pub default: LogLevel,
    pub rules: Vec<(String, LogLevel)>,
}

impl LogFilter {
    /// Longest matching target prefix wins.
    pub fn level_for_target(&self, target: &str) -> LogLevel {
        let mut best: Option<(usize, LogLevel)> = None;
        for (rule_target, level) in &self.rules {
            if rule_target.is_empty() {
                continue;
            }
            if target.starts_with(rule_target.as_str()) {
                let len = rule_target.len();
                if best.map(|(best_len, _)| len > best_len).unwrap_or(true) {
                    best = Some((len, *level));
                }
            }
        }
        best.map(|(_, level)| level).unwrap_or(self.default)
    }
}

impl Default for LogFilter {
    fn default() -> Self {
        LogFilter {
            default: DEFAULT_LEVEL,
            rules: Vec::new(),
        }
    }
}

static LOG_FILTER: OnceLock<Mutex<LogFilter>> = OnceLock::new();
static LOGGER: OnceLock<Mutex<LoggerCore>> = OnceLock::new();

fn filter_state() -> &'static Mutex<LogFilter> {
    LOG_FILTER.get_or_init(|| Mutex::new(LogFilter::default()))
}

fn logger_state() -> &'static Mutex<LoggerCore> {
    LOGGER.get_or_init(|| Mutex::new(LoggerCore::new()))
}

pub fn parse_filter(spec: &str) -> SortitResult<LogFilter> {
    let invalid = || SortitError::InvalidLogFilter {
        spec: spec.to_string(),
    };

    let mut default = None;
    let mut rules = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some((target, level_str)) = part.split_once('=') {
            let level = LogLevel::parse_level(level_str).ok_or_else(invalid)?;
            rules.push((target.trim().to_string(), level));
        } else {
            default = Some(LogLevel::parse_level(part).ok_or_else(invalid)?);
        }
    }

    Ok(LogFilter {
        default: default.unwrap_or(DEFAULT_LEVEL),
        rules,
    })
}

pub fn set_filter(spec: &str) -> SortitResult<()> {
    let filter = parse_filter(spec)?;
    GLOBAL_LOG_LEVEL.store(filter.default as u8, Ordering::Relaxed);
    let mut guard = filter_state().lock().unwrap_or_else(|e| e.into_inner());
    *guard = filter;
    Ok(())
}

pub fn get_global_log_level() -> LogLevel {
    LogLevel::from_u8(GLOBAL_LOG_LEVEL.load(Ordering::Relaxed))
}

pub fn set_global_log_level(level: LogLevel) {
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    let mut guard = filter_state().lock().unwrap_or_else(|e| e.into_inner());
    guard.default = level;
}

pub fn log_enabled(level: LogLevel, target: &str) -> bool {
    if level == LogLevel::Wheesht {
        return false;
    }
    let filter = filter_state().lock().unwrap_or_else(|e| e.into_inner());
    level <= filter.level_for_target(target)
}

/// Read `SORTIT_LOG` (a filter spec) or, failin' that, `SORTIT_LOG_LEVEL`.
///
/// `SORTIT_LOG_FORMAT` picks text, compact or JSON records, an' `SORTIT_LOG_FILE`
/// sends them tae a file (appended) instead o' stderr. Stdout is kept fer snapshots.
pub fn init_from_env() -> SortitResult<()> {
    if let Ok(spec) = std::env::var("SORTIT_LOG") {
        set_filter(&spec)?;
    } else if let Ok(level_str) = std::env::var("SORTIT_LOG_LEVEL") {
        let level =
            LogLevel::parse_level(&level_str).ok_or(SortitError::InvalidLogFilter { spec: level_str })?;
        set_global_log_level(level);
    }

    if let Ok(format_str) = std::env::var("SORTIT_LOG_FORMAT") {
        let format = LogFormat::parse(&format_str)
            .ok_or(SortitError::InvalidLogFormat { format: format_str })?;
        with_logger(|logger| logger.format = format);
    }

    if let Ok(path) = std::env::var("SORTIT_LOG_FILE") {
        if !path.trim().is_empty() {
            with_logger(|logger| {
                logger.sinks = vec![LogSink::File {
                    path,
                    append: true,
                    file: None,
                }];
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub target: String,
    pub file: String,
    pub line: usize,
    pub fields: Vec<(String, JsonValue)>,
}

/// Turn any serializable value intae a log field.
pub fn field_value<T: Serialize + ?Sized>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

#[derive(Debug)]
pub enum LogSink {
    Stderr,
    File {
        path: String,
        append: bool,
        file: Option<std::fs::File>,
    },
    Memory {
        entries: Vec<String>,
        max: usize,
    },
}

#[derive(Debug)]
pub struct LoggerCore {
    pub format: LogFormat,
    pub timestamps: bool,
    pub sinks: Vec<LogSink>,
}

impl LoggerCore {
    pub fn new() -> Self {
        LoggerCore {
            format: LogFormat::Text,
            timestamps: true,
            sinks: vec![LogSink::Stderr],
        }
    }

    pub fn log(&mut self, record: &LogRecord) {
        let formatted = self.format_record(record);
        for sink in &mut self.sinks {
            match sink {
                LogSink::Stderr => {
                    eprintln!("{}", formatted);
                }
                LogSink::File { path, append, file } => {
                    if file.is_none() {
                        let mut opts = OpenOptions::new();
                        opts.create(true).write(true);
                        if *append {
                            opts.append(true);
                        } else {
                            opts.truncate(true);
                        }
                        match opts.open(path.as_str()) {
                            Ok(handle) => {
                                *file = Some(handle);
                            }
                            Err(err) => {
                                eprintln!("Warning: Couldnae open log file '{}': {}", path, err);
                            }
                        }
                    }
                    if let Some(handle) = file {
                        let _ = writeln!(handle, "{}", formatted);
                    }
                }
                LogSink::Memory { entries, max } => {
                    entries.push(formatted.clone());
                    if entries.len() > *max {
                        let drain = entries.len() - *max;
                        entries.drain(0..drain);
                    }
                }
            }
        }
    }

    pub fn format_record(&self, record: &LogRecord) -> String {
        match self.format {
            LogFormat::Json => self.format_json(record),
            LogFormat::Compact => self.format_compact(record),
            LogFormat::Text => self.format_text(record),
        }
    }

    fn format_text(&self, record: &LogRecord) -> String {
        let mut parts = Vec::new();
        parts.push(format!("[{:7}]", record.level.name()));
        if self.timestamps {
            parts.push(timestamp_string());
        }
        if !record.target.is_empty() {
            parts.push(record.target.clone());
        }
        parts.push(format!("{}:{}", record.file, record.line));

        let mut msg = record.message.clone();
        if !record.fields.is_empty() {
            msg = format!("{} {}", msg, format_fields(&record.fields));
        }

        format!("{} | {}", parts.join(" "), msg)
    }

    fn format_compact(&self, record: &LogRecord) -> String {
        let mut msg = record.message.clone();
        if !record.fields.is_empty() {
            msg = format!("{} {}", msg, format_fields(&record.fields));
        }
        format!("[{}] {}", record.level.name(), msg)
    }

    fn format_json(&self, record: &LogRecord) -> String {
        let mut obj = Map::new();
        if self.timestamps {
            obj.insert("ts".to_string(), JsonValue::String(timestamp_string()));
        }
        obj.insert(
            "level".to_string(),
            JsonValue::String(record.level.name().to_string()),
        );
        obj.insert(
            "target".to_string(),
            JsonValue::String(record.target.clone()),
        );
        obj.insert("file".to_string(), JsonValue::String(record.file.clone()));
        obj.insert("line".to_string(), json!(record.line));
        obj.insert("msg".to_string(), JsonValue::String(record.message.clone()));

        let fields: Map<String, JsonValue> = record.fields.iter().cloned().collect();
        obj.insert("fields".to_string(), JsonValue::Object(fields));

        JsonValue::Object(obj).to_string()
    }
}

impl Default for LoggerCore {
    fn default() -> Self {
        Self::new()
    }
}

fn format_fields(fields: &[(String, JsonValue)]) -> String {
    fields
        .iter()
        .map(|(k, v)| match v {
            JsonValue::String(s) => format!("{}={}", k, s),
            other => format!("{}={}", k, other),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Send a record tae the global logger. Callers check `log_enabled` first.
pub fn log(record: &LogRecord) {
    let mut logger = logger_state().lock().unwrap_or_else(|e| e.into_inner());
    logger.log(record);
}

/// Reconfigure the global logger (format, sinks, timestamps).
pub fn with_logger<R>(f: impl FnOnce(&mut LoggerCore) -> R) -> R {
    let mut logger = logger_state().lock().unwrap_or_else(|e| e.into_inner());
    f(&mut logger)
}

/// Everything held in the global logger's memory sinks.
pub fn memory_entries() -> Vec<String> {
    with_logger(|logger| {
        logger
            .sinks
            .iter()
            .filter_map(|sink| match sink {
                LogSink::Memory { entries, .. } => Some(entries.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    })
}

pub fn timestamp_string() -> String {
    format!("{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
}

/// Log a record wi' the caller's file an' line.
///
/// ```
/// use sortit::logging::LogLevel;
/// sortit::sortit_log!(LogLevel::Mutter, "sortit::demo", "sortin'", len = 4);
/// ```
#[macro_export]
macro_rules! sortit_log {
    ($level:expr, $target:expr, $msg:expr $(, $key:ident = $value:expr)* $(,)?) => {
        if $crate::logging::log_enabled($level, $target) {
            $crate::logging::log(&$crate::logging::LogRecord {
                level: $level,
                message: ($msg).to_string(),
                target: ($target).to_string(),
                file: file!().to_string(),
                line: line!() as usize,
                fields: vec![$((stringify!($key).to_string(), $crate::logging::field_value(&$value))),*],
            });
        }
    };
}

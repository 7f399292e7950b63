//! Logging setup for makeip
//!
//! Plain levels ("warn", "info", ...) go through `env_logger` with a
//! `makeip:` prefixed format. `json` or `json:<level>` switches to one JSON
//! object per line, written to stderr or to `MAKEIP_LOG_PATH`.

use chrono::{Local, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// Environment variable consulted when no level is given on the command line
pub const LOG_LEVEL_ENV: &str = "MAKEIP_LOG_LEVEL";

/// Environment variable naming a file for JSON log output
pub const LOG_PATH_ENV: &str = "MAKEIP_LOG_PATH";

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: Level,
    target_file: Mutex<Option<std::fs::File>>,
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: Level, log_path: Option<String>) -> Self {
        let target_file = log_path
            .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.write_all(line.as_bytes());
                let _ = file.flush();
                return;
            }
        }
        let _ = io::stderr().write_all(line.as_bytes());
        let _ = io::stderr().flush();
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_entry = json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().to_string().to_lowercase(),
            "@message": record.args().to_string(),
            "@module": record.target(),
            "@pid": std::process::id(),
        });

        let line = format!("{}\n", serde_json::to_string(&log_entry).unwrap_or_default());
        self.write_line(&line);
    }

    fn flush(&self) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}

/// Parse a level name, falling back to `default` for anything unknown
pub fn parse_level_filter(name: &str, default: LevelFilter) -> LevelFilter {
    match name.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => default,
    }
}

/// Initialize logging with the given level string.
///
/// Returns the effective level name.
pub fn init_with_level(level_str: &str) -> String {
    let (use_json, actual_level) = if let Some(stripped) = level_str.strip_prefix("json:") {
        (true, stripped)
    } else if level_str == "json" {
        (true, "info")
    } else {
        (false, level_str)
    };

    let level_filter = parse_level_filter(actual_level, LevelFilter::Warn);

    if !use_json {
        let result = env_logger::Builder::new()
            .filter_level(level_filter)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "makeip: [{} {} {}] {}",
                    Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .try_init();
        if let Err(e) = result {
            eprintln!("Failed to initialize logger: {e}");
        }
        return actual_level.to_string();
    }

    let log_path = env::var(LOG_PATH_ENV).ok();
    let level = level_filter.to_level().unwrap_or(Level::Error);
    let logger = Box::new(JsonLogger::new(level, log_path));

    if let Err(e) = log::set_boxed_logger(logger) {
        eprintln!("Failed to initialize JSON logger: {e}");
        return actual_level.to_string();
    }

    log::set_max_level(level_filter);
    actual_level.to_string()
}

/// Initialize logging from an explicit level, `MAKEIP_LOG_LEVEL`, or the
/// verbosity flag, in that order.
pub fn init(cli_level: Option<&str>, verbose: bool) -> String {
    if let Some(level) = cli_level {
        return init_with_level(level);
    }
    if let Ok(level) = env::var(LOG_LEVEL_ENV) {
        return init_with_level(&level);
    }
    init_with_level(if verbose { "info" } else { "warn" })
}

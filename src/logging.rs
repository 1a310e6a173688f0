//! Global logger for driver binaries.

use log::{Level, LevelFilter, Log, Metadata, Record};

/// a simple logger writing colored lines to stderr
struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = match record.level() {
            Level::Error => 31, // Red
            Level::Warn => 93,  // BrightYellow
            Level::Info => 34,  // Blue
            Level::Debug => 32, // Green
            Level::Trace => 90, // BrightBlack
        };
        eprintln!(
            "\u{1B}[{}m[{:>5}] {}\u{1B}[0m",
            color,
            record.level(),
            record.args()
        );
    }
    fn flush(&self) {}
}

/// initiate logger; the max level comes from the LOG environment variable
pub fn init() {
    static LOGGER: SimpleLogger = SimpleLogger;
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(match std::env::var("LOG").as_deref() {
        Ok("ERROR") => LevelFilter::Error,
        Ok("WARN") => LevelFilter::Warn,
        Ok("INFO") => LevelFilter::Info,
        Ok("DEBUG") => LevelFilter::Debug,
        Ok("TRACE") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    });
}

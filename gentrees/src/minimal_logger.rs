use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// Logs to stdout, or to stderr for errors, prefixed by the level and the
/// crate that emitted the record
pub struct MinimalLogger {
    max_level: LevelFilter,
}

impl MinimalLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    pub fn install(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);

        Ok(())
    }
}

impl log::Log for MinimalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_string = match record.level() {
            Level::Error => record.level().to_string().red(),
            Level::Warn => record.level().to_string().yellow(),
            Level::Info => record.level().to_string().cyan(),
            Level::Debug => record.level().to_string().purple(),
            Level::Trace => record.level().to_string().normal(),
        };

        let origin = record.target().split("::").next().unwrap_or_default();

        if record.level() > LevelFilter::Error {
            println!("{:<5} {} {}", level_string, origin.dimmed(), record.args());
        } else {
            eprintln!("{:<5} {} {}", level_string, origin.dimmed(), record.args());
        }
    }

    fn flush(&self) {}
}

//! Stderr logger. Stdout is reserved for frames.

use std::io::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Log level for a given number of `-v` and `-q` flags, starting from `Warn`.
pub fn level_filter(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => LevelFilter::Off,
        -1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && is_own_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

// Keeps reqwest and hyper chatter out of the terminal.
fn is_own_target(target: &str) -> bool {
    target.starts_with("termphoto")
}

pub fn initialize(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_shift_the_level() {
        assert_eq!(level_filter(0, 0), LevelFilter::Warn);
        assert_eq!(level_filter(1, 0), LevelFilter::Info);
        assert_eq!(level_filter(2, 0), LevelFilter::Debug);
        assert_eq!(level_filter(5, 0), LevelFilter::Trace);
        assert_eq!(level_filter(0, 1), LevelFilter::Error);
        assert_eq!(level_filter(0, 3), LevelFilter::Off);
        assert_eq!(level_filter(2, 2), LevelFilter::Warn);
    }

    #[test]
    fn only_own_crates_are_logged() {
        assert!(is_own_target("termphoto_render::slideshow"));
        assert!(is_own_target("termphoto::flickr"));
        assert!(!is_own_target("reqwest::connect"));
    }
}

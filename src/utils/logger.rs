//! File-backed logger
//!
//! A `log::Log` implementation that writes every record to a log file and
//! mirrors it to the console.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

pub struct Logger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Logger {
    /// Creates a logger writing to `log_file`, truncating it
    pub fn new<P: AsRef<Path>>(log_file: P, level: LevelFilter) -> io::Result<Self> {
        let file = File::create(log_file)?;
        Ok(Logger {
            file: Mutex::new(file),
            level,
        })
    }

    fn write_line(&self, message: &str) -> io::Result<()> {
        // A poisoned lock still holds a usable file handle
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(file, "{}", message)?;
        file.flush()
    }

    /// Installs a file logger as the global logger
    pub fn init_global_logger<P: AsRef<Path>>(log_file: P, level: LevelFilter) -> io::Result<()> {
        let logger = Logger::new(log_file, level)?;

        if log::set_boxed_logger(Box::new(logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            let _ = self.write_line(&message);
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        let _ = file.flush();
    }
}

//! Logger for the starmap binary. Writes timestamped lines to stderr and,
//! when asked, appends them to a log file as well.

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Structure representing the starmap logger
pub struct StarmapLogger {
    level: LevelFilter,
    file: Option<Arc<Mutex<File>>>,
    log_path: Option<PathBuf>,
}

impl StarmapLogger {
    /// Create a new StarmapLogger with the specified log level
    ///
    /// When `log_path` is given its parent directory is created and the file
    /// is opened for appending.
    pub fn new(level: LevelFilter, log_path: Option<&Path>) -> Result<Self> {
        let file = match log_path {
            Some(path) => {
                if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    create_dir_all(dir).with_context(|| {
                        format!("Failed to create log directory: {}", dir.display())
                    })?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                Some(Arc::new(Mutex::new(file)))
            }
            None => None,
        };

        Ok(Self {
            level,
            file,
            log_path: log_path.map(Path::to_path_buf),
        })
    }

    /// Initialize the logger with the specified log level
    pub fn init(level: LevelFilter, log_path: Option<&Path>) -> Result<()> {
        let logger = Self::new(level, log_path)?;
        let log_path = logger.log_path.clone();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        if let Some(path) = log_path {
            log::info!("Log file: {}", path.display());
        }
        Ok(())
    }

    /// Maps the number of `-v` flags to a level. Warnings are always shown.
    pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for StarmapLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = Self::format(record);

            if let Some(file) = &self.file {
                if let Ok(mut file) = file.lock() {
                    // A failed write must not take the build down with it
                    let _ = writeln!(file, "{}", message);
                }
            }

            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Writes a banner that separates sections in the log.
pub fn log_section(name: &str) {
    let separator = "=".repeat(50);
    log::info!("{}", separator);
    log::info!("SECTION: {}", name);
    log::info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(StarmapLogger::level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(StarmapLogger::level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(StarmapLogger::level_for_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn test_writes_to_file() {
        let path = std::env::temp_dir()
            .join("starmap_logger_test")
            .join("starmap.log");
        let _ = std::fs::remove_file(&path);

        let logger = StarmapLogger::new(LevelFilter::Info, Some(&path)).unwrap();
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("starmap")
                .args(format_args!("building 2 orbit(s)"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("filtered out"))
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO [starmap] building 2 orbit(s)"));
        assert!(!contents.contains("filtered out"));

        let _ = std::fs::remove_file(&path);
    }
}

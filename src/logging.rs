use crate::error::Result;
use log::{LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
struct SimpleLogger {
    log_file: PathBuf,
    level: LevelFilter,
    // The terminal client owns stdout/stderr, so only `serve` mirrors to stderr.
    mirror_stderr: bool,
}

static LOGGER: OnceCell<SimpleLogger> = OnceCell::new();

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_entry = format!(
                "{} {} - {}\n",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
            if self.mirror_stderr {
                eprint!("{log_entry}");
            }
        }
    }

    fn flush(&self) {}
}

pub fn init(log_dir: PathBuf, debug_mode: bool, mirror_stderr: bool) -> Result<()> {
    create_dir_all(&log_dir)?;

    let level = if debug_mode {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = LOGGER.get_or_init(|| SimpleLogger {
        log_file: log_dir.join("log.txt"),
        level,
        mirror_stderr,
    });

    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn second_init_reports_a_logger_error() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path().to_path_buf(), true, false).unwrap();
        log::info!("first line");

        let err = init(dir.path().to_path_buf(), true, false).unwrap_err();
        assert!(matches!(err, AppError::Logger(_)));
        assert!(err.to_string().starts_with("Logger error"));

        let written = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
        assert!(written.contains("INFO - first line"));
    }
}

//! Logger setup and standardized log lines for the ETL stages.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use env_logger::{Env, Target, WriteStyle};

use crate::error::Result;
use crate::error::util::ensure_directory;

/// Width of the separator lines framing report sections
pub const RULE_WIDTH: usize = 80;

/// Writer duplicating every log line to stdout and to a log file
pub struct TeeWriter {
    file: File,
}

impl TeeWriter {
    #[must_use]
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Path of a new timestamped log file, `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.log`
#[must_use]
pub fn log_file_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{prefix}_{}.log", Local::now().format("%Y%m%d_%H%M%S")))
}

/// Install the global logger, writing to stdout and a timestamped file
///
/// The filter defaults to `info` and can be overridden with `RUST_LOG`.
/// Returns the path of the log file.
pub fn init_logging(dir: &Path, prefix: &str) -> Result<PathBuf> {
    ensure_directory(dir, "log files")?;
    let path = log_file_path(dir, prefix);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:<5}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter::new(file))))
        .try_init()
        .context("Failed to initialise the logger")?;

    Ok(path)
}

/// Log the header of pipeline stage `step` out of `total`
pub fn log_stage(step: usize, total: usize, title: &str) {
    log::info!("[{step}/{total}] {title}");
}

/// Log an operation completion with consistent format
pub fn log_operation_complete(operation: &str, items: usize, elapsed: Duration) {
    log::info!("Successfully {operation} {items} rows in {elapsed:.2?}");
}

/// Log a framed section title
pub fn log_banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    log::info!("{rule}");
    log::info!("{title}");
    log::info!("{rule}");
}

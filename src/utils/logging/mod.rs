//! Logging utilities for output and progress tracking

pub mod log;
pub mod progress;

pub use self::log::{
    TeeWriter, init_logging, log_banner, log_file_path, log_operation_complete, log_stage,
};
pub use self::progress::{create_main_progress_bar, create_spinner, finish_and_clear, finish_progress_bar};

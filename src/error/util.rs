//! Utility functions for error handling
//!
//! Helpers that open files and prepare directories with rich error context.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;

use crate::error::Result;

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        anyhow::bail!("File not found: {} (needed for: {purpose})", path.display());
    }

    if !path.is_file() {
        anyhow::bail!(
            "Path is not a file: {} (expected a file for: {purpose})",
            path.display()
        );
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            io::ErrorKind::NotFound => {
                "File not found - it may have been deleted during operation".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        anyhow::Error::new(e).context(format!("{context}: {}", path.display()))
    })
}

/// Make sure a directory exists, creating it (and its parents) when missing
pub fn ensure_directory(path: &Path, purpose: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!(
                "Path is not a directory: {} (expected a directory for: {purpose})",
                path.display()
            );
        }
        return Ok(());
    }

    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {} for: {purpose}", path.display()))
}

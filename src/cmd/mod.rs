pub mod grooves;
pub mod optimize;
pub mod plot;
pub mod validate;

use std::path::{Path, PathBuf};

/// Explicit `--output`, else the folder holding the table.
fn output_dir(table: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| {
        table
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::table::ResultTable;

/// File name used when neither the CLI nor the config names one
pub const DEFAULT_EXPORT_FILE: &str = "prioritization_results.csv";

/// MIME type of the export, for surfaces that serve it as a download
pub const CSV_MIME: &str = "text/csv";

/// Pick the export path: explicit argument, then config, then the default name.
pub fn resolve_export_path(explicit: Option<PathBuf>, config: &Config) -> PathBuf {
    explicit
        .or_else(|| config.export_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))
}

/// Write the table as CSV atomically, so a failed export never leaves a
/// half-written file behind.
pub fn write_csv(path: &Path, table: &ResultTable, ranked: bool) -> Result<()> {
    let text = if ranked {
        table.to_ranked_delimited_text()?
    } else {
        table.to_delimited_text()?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(text.as_bytes())
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    tracing::info!("Exported {} rows to {} ({})", table.len(), path.display(), CSV_MIME);
    Ok(())
}

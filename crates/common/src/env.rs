//! Environment/runtime helpers
//!
//! Startup report on the data file location.

use std::path::Path;

use tracing::{info, warn};

/// Log whether `data_file` already exists; returns `true` if it does.
pub async fn check_data_file(data_file: &Path) -> bool {
    let exists = tokio::fs::metadata(data_file).await.map(|m| m.is_file()).unwrap_or(false);
    if exists {
        info!(data_file = %data_file.display(), "using existing data file");
    } else {
        warn!(data_file = %data_file.display(), "data file not found; an empty document will be created");
    }
    exists
}

//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure the data directory exists; warn when the optional public dir is missing.
///
/// Returns whether the public directory is present so callers can decide to
/// mount static file serving.
pub async fn ensure_env(public_dir: &Path, data_dir: &Path) -> anyhow::Result<bool> {
    let has_public = tokio::fs::metadata(public_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !has_public {
        warn!(public_dir = %public_dir.display(), "public directory not found; static assets disabled");
    }
    if !data_dir.as_os_str().is_empty() {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    }
    Ok(has_public)
}

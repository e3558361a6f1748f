//! Load and atomically save the bookmarks file.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use super::model::BookmarkCollection;

/// Read and parse the bookmarks JSON file.
pub fn load(path: &Path) -> Result<BookmarkCollection> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read bookmarks file: {}", path.display()))?;
    let collection = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse bookmarks JSON: {}", path.display()))?;
    Ok(collection)
}

/// Write the collection as 2-space indented JSON.
///
/// Writes to a temp file next to `path` and renames it into place, so a crash
/// mid-write never leaves a truncated bookmarks file.
///
/// An existing file keeps its permissions, and a symlinked file is written
/// through the link rather than replaced.
pub fn save(path: &Path, collection: &BookmarkCollection) -> Result<()> {
    let json = serde_json::to_string_pretty(collection).context("serialize bookmarks")?;
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let path = resolved.as_path();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .context("write bookmarks temp file")?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .context("copy bookmarks file permissions")?;
    }
    tmp.as_file().sync_all().context("sync bookmarks temp file")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace bookmarks file: {}", path.display()))?;
    Ok(())
}

use crate::RawDocument;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Read every `.html` / `.htm` file under `dir`, sorted by path.
///
/// The id is the path relative to `dir` with `/` separators, so top-level pages
/// are keyed by their bare file name. Files that are not UTF-8 are skipped.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<RawDocument>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("corpus directory {} does not exist", dir.display());
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if !p.is_file() || !is_html(p) {
            continue;
        }
        let bytes = fs::read(p).with_context(|| format!("reading {}", p.display()))?;
        let id = relative_id(dir, p);
        match String::from_utf8(bytes) {
            Ok(markup) => out.push(RawDocument { id, markup }),
            Err(_) => tracing::warn!(%id, "skipping document: not valid UTF-8"),
        }
    }
    tracing::info!(dir = %dir.display(), files = out.len(), "found HTML files to index");
    Ok(out)
}

fn is_html(p: &Path) -> bool {
    matches!(
        p.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase()).as_deref(),
        Some("html" | "htm")
    )
}

fn relative_id(root: &Path, p: &Path) -> String {
    let rel = p.strip_prefix(root).unwrap_or(p);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

//! Repository layout rules for synced files.
//!
//! Within a collection's configured directory:
//!
//! ```text
//! <dir>/<alias>/<alias>.alias              top-level alias code
//! <dir>/<alias>/<sub>/<sub>.alias          one directory level per subcommand
//! <dir>/<alias>/<alias>.md                 alias docs (sibling of the code file)
//! <dir>/snippets/<snippet>.snippet         snippet code
//! <dir>/snippets/<snippet>.md              snippet docs
//! ```
//!
//! Doc files are written with `.md`; `.markdown` and `.MARKDOWN` are also
//! accepted when reading.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Doc file extensions accepted next to a code file, in probe order.
/// The first entry is the one used when creating a new doc file.
pub const DOC_EXTENSIONS: [&str; 3] = ["md", "markdown", "MARKDOWN"];

/// Name of the snippets directory inside a collection directory.
pub const SNIPPETS_DIR: &str = "snippets";

/// Append `.{suffix}` to a path without treating existing dots as an
/// extension boundary (item names may legitimately contain dots).
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}.{suffix}", base.display()))
}

/// All doc file candidates for a code file base path, in probe order.
pub fn doc_candidates(base: &Path) -> Vec<PathBuf> {
    DOC_EXTENSIONS
        .iter()
        .map(|ext| with_suffix(base, ext))
        .collect()
}

/// The first doc file that exists next to `base`, if any.
pub fn existing_doc(base: &Path) -> Option<PathBuf> {
    doc_candidates(base).into_iter().find(|p| p.exists())
}

/// `<dir>/snippets/`
pub fn snippets_dir(dir: &Path) -> PathBuf {
    dir.join(SNIPPETS_DIR)
}

/// Recursively collect files under `dir` whose names end with `.{suffix}`,
/// in deterministic (sorted) order. A missing directory yields no files.
pub fn find_files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, SyncError> {
    let mut found = Vec::new();
    if dir.exists() {
        walk(dir, &format!(".{suffix}"), &mut found)?;
    }
    Ok(found)
}

fn walk(dir: &Path, dotted: &str, found: &mut Vec<PathBuf>) -> Result<(), SyncError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            walk(&path, dotted, found)?;
        } else if path.to_string_lossy().ends_with(dotted) {
            found.push(path);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

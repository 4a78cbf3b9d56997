//! Loading the units declared in a directory
//!
//! Units are compiled in, so "loading" a directory means selecting the
//! registered units whose source file lives there.

use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::registry::Registry;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File pattern used when none is given
pub const DEFAULT_PATTERN: &str = "*.rs";

/// Select the units of `catalog` declared in files directly inside `dir`
/// whose names match `pattern`.
///
/// Files are visited in sorted order; units from one file keep their
/// registration order. Files that declare no units are ignored, but a
/// warning is logged when matching files exist and none of them declares a
/// unit, since that usually means the recorded source paths are relative
/// to a different root than `dir`.
pub fn load_units(
    dir: impl AsRef<Path>,
    pattern: &str,
    catalog: &Registry,
    log: &mut Logger,
) -> Result<Registry> {
    let dir = normalize_dir(dir.as_ref());
    if !dir.is_dir() {
        return Err(Error::NotADirectory { path: dir });
    }

    let files = matching_files(&dir, pattern)?;

    let mut loaded = Registry::new();
    for file in &files {
        for entry in catalog.entries() {
            if declared_in(entry.source, file) {
                loaded.register_entry(entry.clone())?;
            }
        }
    }

    if loaded.is_empty() && !files.is_empty() && !catalog.is_empty() {
        log.warning(format!(
            "Found {} file(s) matching '{}' in '{}' but none declares a registered unit; \
             unit sources are matched against file!() paths, which are relative to the \
             workspace root",
            files.len(),
            pattern,
            dir.display()
        ));
    }

    Ok(loaded)
}

/// Files directly inside `dir` whose names match the glob `pattern`
fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // Simple glob support: `*` matches anything, everything else is literal
    let pattern_regex = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    let regex = regex::Regex::new(&format!("^{}$", pattern_regex))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Some(file_name) = entry.file_name().to_str() {
                if regex.is_match(file_name) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Whether a unit registered from `source` lives in `file`.
///
/// `source` comes from `file!()` and is usually relative to the package
/// root, so a component-wise suffix match is used.
fn declared_in(source: &str, file: &Path) -> bool {
    let source = Path::new(source);
    if source.is_absolute() {
        return source == file;
    }
    file.ends_with(source)
}

/// Drop trailing spaces and separators, keeping a lone root intact
fn normalize_dir(dir: &Path) -> PathBuf {
    let raw = dir.to_string_lossy();
    let trimmed = raw.trim_end_matches([' ', '/', '\\']);
    if trimmed.is_empty() {
        dir.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

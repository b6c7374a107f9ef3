//! Text and pattern utilities used by the probes and the getter façade.
//!
//! The probes lean on these for locating sysfs-style sensor paths and for
//! normalizing free-form strings such as CPU model names. Traversal order of
//! the file-tree search is whatever the OS yields; the first match wins.

use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use walkdir::WalkDir;

use crate::error::Result;

/// Walks the subtree rooted at `base` and returns the first regular file or
/// directory whose full path matches `pattern`.
///
/// Unreadable entries are skipped rather than aborting the walk.
pub fn find(base: impl AsRef<Path>, pattern: &str) -> Result<Option<PathBuf>> {
    let re = Regex::new(pattern)?;

    for entry in WalkDir::new(base).into_iter().filter_map(|e| e.ok()) {
        let kind = entry.file_type();
        if (kind.is_file() || kind.is_dir()) && re.is_match(&entry.path().to_string_lossy()) {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

/// Walks the subtree rooted at `base` and collects every regular file or
/// directory whose full path matches `pattern`.
pub fn find_all(base: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let re = Regex::new(pattern)?;
    let mut paths = Vec::new();

    for entry in WalkDir::new(base).into_iter().filter_map(|e| e.ok()) {
        let kind = entry.file_type();
        if (kind.is_file() || kind.is_dir()) && re.is_match(&entry.path().to_string_lossy()) {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

/// Substitutes the first match of `pattern` in `text` with `replacement`,
/// taken literally.
pub fn replace_first(pattern: &str, replacement: &str, text: &str) -> Result<String> {
    Ok(replace_first_re(&Regex::new(pattern)?, replacement, text))
}

/// [`replace_first`] with a precompiled pattern.
pub fn replace_first_re(re: &Regex, replacement: &str, text: &str) -> String {
    re.replace(text, NoExpand(replacement)).into_owned()
}

/// Repeatedly substitutes the first match of `pattern` until no matches
/// remain or the text stabilizes.
pub fn replace_all(pattern: &str, replacement: &str, text: &str) -> Result<String> {
    Ok(replace_all_re(&Regex::new(pattern)?, replacement, text))
}

/// [`replace_all`] with a precompiled pattern.
///
/// A substitution that does not strictly reduce the match count can never
/// converge, so it is applied once and the loop stops.
pub fn replace_all_re(re: &Regex, replacement: &str, text: &str) -> String {
    let mut out = text.to_string();
    let mut remaining = re.find_iter(&out).count();

    while remaining > 0 {
        let next = re.replace(&out, NoExpand(replacement)).into_owned();
        if next == out {
            break;
        }

        let next_remaining = re.find_iter(&next).count();
        out = next;
        if next_remaining >= remaining {
            break;
        }
        remaining = next_remaining;
    }

    out
}

/// Collapses every whitespace run in `text`, internal and edge, to a single
/// space. Pure-whitespace input yields the empty string.
pub fn trim(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `used / total * 100`, defined as 0 when `total` is zero.
pub fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

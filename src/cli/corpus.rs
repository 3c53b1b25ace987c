//! Corpus directory handling for the `train` and `evaluate` commands.
//!
//! A corpus directory holds one plain-text file per category; the file stem
//! is the category name. The leading fraction of each file's characters is
//! training text and the rest is held out for evaluation.

use std::fs;
use std::path::{Path, PathBuf};

use rand::prelude::*;

use crate::error::{GenreError, Result};

/// One category's corpus file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    pub category: String,
    pub path: PathBuf,
}

/// List the corpus files in `dir`, sorted by file name.
pub fn discover(dir: &Path) -> Result<Vec<CorpusFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.starts_with('.') {
            continue;
        }
        files.push(CorpusFile {
            category: stem.to_string(),
            path,
        });
    }

    if files.is_empty() {
        return Err(GenreError::invalid_argument(format!(
            "no corpus files found in {}",
            dir.display()
        )));
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Read a text file, replacing invalid UTF-8.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Check that a training fraction lies in `(0, 1]`.
pub fn check_fraction(fraction: f64) -> Result<()> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(GenreError::invalid_argument(format!(
            "fraction must be in (0, 1], got {fraction}"
        )))
    }
}

/// Split `text` after the leading `fraction` of its characters.
pub fn split_at_fraction(text: &str, fraction: f64) -> (&str, &str) {
    let chars = text.chars().count();
    let head = ((chars as f64) * fraction).floor() as usize;
    let split = text
        .char_indices()
        .nth(head)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.split_at(split)
}

/// Draw `repeats` random windows of `size` consecutive words from `words`.
///
/// When `words` is no longer than `size` every sample is the whole text.
pub fn sample_windows<R: Rng>(
    words: &[&str],
    size: usize,
    repeats: usize,
    rng: &mut R,
) -> Vec<String> {
    if words.is_empty() || size == 0 {
        return Vec::new();
    }

    (0..repeats)
        .map(|_| {
            if words.len() <= size {
                words.join(" ")
            } else {
                let start = rng.random_range(0..=words.len() - size);
                words[start..start + size].join(" ")
            }
        })
        .collect()
}

/// Read a stoplist file: one word per line, blank lines ignored.
pub fn load_stoplist(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

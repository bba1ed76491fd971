//! Walk of the training tree and per-language/per-category sample counts.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::ReportSettings;

/// Sample counts indexed both ways. Built in one pass; the two maps are
/// always transposes of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingTally {
    languages: BTreeMap<String, BTreeMap<String, u64>>,
    categories: BTreeMap<String, BTreeMap<String, u64>>,
}

impl TrainingTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one sample of `language` in `category`.
    pub fn record(&mut self, language: &str, category: &str) {
        *self
            .languages
            .entry(language.to_string())
            .or_default()
            .entry(category.to_string())
            .or_insert(0) += 1;
        *self
            .categories
            .entry(category.to_string())
            .or_default()
            .entry(language.to_string())
            .or_insert(0) += 1;
    }

    /// language → (category → count)
    pub fn languages(&self) -> &BTreeMap<String, BTreeMap<String, u64>> {
        &self.languages
    }

    /// category → (language → count)
    pub fn categories(&self) -> &BTreeMap<String, BTreeMap<String, u64>> {
        &self.categories
    }

    pub fn count(&self, language: &str, category: &str) -> u64 {
        self.languages
            .get(language)
            .and_then(|cats| cats.get(category))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Language code of a sample filename: everything before the first `_` or `-`.
///
/// Hidden files, names without a separator and names with an empty prefix
/// yield `None`.
pub fn language_code(filename: &str) -> Option<&str> {
    if filename.starts_with('.') {
        return None;
    }
    let end = filename.find(&['_', '-'][..])?;
    let code = &filename[..end];
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// Walks `root/<category>/<sample>` and tallies samples per language and category.
///
/// Only files directly inside a category are counted. Categories listed in
/// `settings.skipped_categories` are not entered. Unreadable entries below the
/// root are logged and skipped; a root that is not a directory is an error.
pub fn scan_training_root(root: &Path, settings: &ReportSettings) -> Result<TrainingTally> {
    let meta = fs::metadata(root).with_context(|| format!("stat {}", root.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut tally = TrainingTally::new();
    let categories = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in categories {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let category = entry.file_name().to_string_lossy().into_owned();
        if settings.is_skipped(&category) {
            tracing::debug!("not a training category: {}", category);
            continue;
        }
        scan_category(entry.path(), &category, &mut tally);
    }

    tracing::info!(
        "scanned {}: {} languages, {} categories",
        root.display(),
        tally.languages.len(),
        tally.categories.len()
    );
    Ok(tally)
}

fn scan_category(dir: &Path, category: &str, tally: &mut TrainingTally) {
    let samples = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);

    for entry in samples {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable sample in {}: {}", dir.display(), e);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            tracing::debug!("skipping non UTF-8 name in {}", dir.display());
            continue;
        };
        if let Some(code) = language_code(name) {
            tally.record(code, category);
        }
    }
}

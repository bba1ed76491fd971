//! Training coverage report.
//!
//! Walks `root/<category>/<language>_*` samples, tallies them per language and
//! category, rates each language's maturity and renders static HTML.

mod html;
mod maturity;
mod names;
mod tally;

pub use html::{escape, render_html};
pub use maturity::{assess, training_level, Assessment, Maturity};
pub use names::{display_name, language_name};
pub use tally::{language_code, scan_training_root, TrainingTally};

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ReportSettings;

/// Tally plus the maturity rating of every language in it.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub tally: TrainingTally,
    /// Keyed by language code, sorted.
    pub assessments: BTreeMap<String, Assessment>,
}

impl TrainingReport {
    pub fn from_tally(tally: TrainingTally, settings: &ReportSettings) -> Self {
        let assessments = tally
            .languages()
            .keys()
            .map(|language| (language.clone(), assess(language, &tally, settings)))
            .collect();
        Self { tally, assessments }
    }

    pub fn maturity_of(&self, language: &str) -> Option<Maturity> {
        self.assessments.get(language).map(|a| a.maturity)
    }
}

/// Scans `root` and rates every language found.
pub fn build_report(root: &Path, settings: &ReportSettings) -> Result<TrainingReport> {
    let tally = scan_training_root(root, settings)?;
    let report = TrainingReport::from_tally(tally, settings);
    for (language, assessment) in &report.assessments {
        tracing::debug!(
            "{} ({}): {}",
            language,
            display_name(language),
            assessment.maturity
        );
    }
    Ok(report)
}

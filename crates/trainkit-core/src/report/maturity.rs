//! Heuristic maturity rating per language.
//!
//! Two ladders with fixed thresholds. The volume ladder looks at
//! `log10(samples)` per category; the coverage ladder at the share of
//! trainable categories the language has any samples in. Thresholds and the
//! order they are applied in are part of the report's meaning; do not tune.

use std::collections::BTreeSet;
use std::fmt;

use super::TrainingTally;
use crate::config::ReportSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Maturity {
    Zilch,
    Prealpha,
    Prealpha2,
    Prealpha3,
    Alpha,
    Alpha2,
    Alpha3,
    Beta,
    Beta2,
    Beta3,
}

impl Maturity {
    pub fn name(self) -> &'static str {
        match self {
            Maturity::Zilch => "zilch",
            Maturity::Prealpha => "prealpha",
            Maturity::Prealpha2 => "prealpha2",
            Maturity::Prealpha3 => "prealpha3",
            Maturity::Alpha => "alpha",
            Maturity::Alpha2 => "alpha2",
            Maturity::Alpha3 => "alpha3",
            Maturity::Beta => "beta",
            Maturity::Beta2 => "beta2",
            Maturity::Beta3 => "beta3",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First rung whose level is below the current rating and whose threshold
/// the category's training level falls under wins.
const VOLUME_LADDER: [(Maturity, f64); 5] = [
    (Maturity::Alpha, 0.30),
    (Maturity::Alpha2, 0.48),
    (Maturity::Alpha3, 0.60),
    (Maturity::Beta, 0.78),
    (Maturity::Beta2, 0.90),
];

/// Coverage ratio at or above the threshold sets the rating.
const COVERAGE_LADDER: [(f64, Maturity); 4] = [
    (0.90, Maturity::Alpha3),
    (0.75, Maturity::Alpha2),
    (0.65, Maturity::Alpha),
    (0.50, Maturity::Prealpha3),
];

/// Above this coverage, each missing category is listed and rates `prealpha2`.
const LISTS_MISSING_ABOVE: f64 = 0.33;
/// Below this coverage, with at most `ZILCH_MAX_CATEGORIES` categories: `zilch`.
const ZILCH_BELOW: f64 = 0.1;
const ZILCH_MAX_CATEGORIES: usize = 3;

/// "Relative training level" of a category: `log10(samples)`.
pub fn training_level(count: u64) -> f64 {
    (count as f64).log10()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub maturity: Maturity,
    /// Categories this language has no samples in, listed when coverage is
    /// high enough that the gap matters. In tally order.
    pub missing: Vec<String>,
    /// `trained categories / trainable categories`, when the language does not
    /// cover every trainable category.
    pub coverage: Option<f64>,
}

fn apply_volume_ladder(current: Maturity, level: f64) -> Maturity {
    for (rung, threshold) in VOLUME_LADDER {
        if current > rung && level < threshold {
            return rung;
        }
    }
    current
}

fn coverage_rung(ratio: f64) -> Option<Maturity> {
    COVERAGE_LADDER
        .iter()
        .find(|(threshold, _)| ratio >= *threshold)
        .map(|(_, m)| *m)
}

/// Rates `language` against the whole tally.
pub fn assess(language: &str, tally: &TrainingTally, settings: &ReportSettings) -> Assessment {
    let empty = Default::default();
    let trained = tally.languages().get(language).unwrap_or(&empty);

    let mut maturity = Maturity::Beta3;
    for (category, &count) in trained {
        if settings.is_non_maturity(category) {
            continue;
        }
        maturity = apply_volume_ladder(maturity, training_level(count));
    }

    let non_maturity: BTreeSet<&str> = settings
        .non_maturity_categories
        .iter()
        .map(String::as_str)
        .collect();
    let total = tally.categories().len() as i64 - non_maturity.len() as i64;
    let covered = trained.len();

    let mut missing = Vec::new();
    let mut coverage = None;
    if (covered as i64) < total {
        let ratio = covered as f64 / total as f64;
        coverage = Some(ratio);
        for category in tally.categories().keys() {
            if ratio > LISTS_MISSING_ABOVE {
                if !trained.contains_key(category) {
                    missing.push(category.clone());
                    maturity = Maturity::Prealpha2;
                }
            } else if covered <= ZILCH_MAX_CATEGORIES && ratio < ZILCH_BELOW {
                maturity = Maturity::Zilch;
            } else {
                maturity = Maturity::Prealpha;
            }
            if let Some(rung) = coverage_rung(ratio) {
                maturity = rung;
            }
        }
    }

    Assessment {
        maturity,
        missing,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `n` trainable categories plus the three non-maturity ones, each holding
    /// ten samples of a filler language.
    fn tally_with_categories(n: usize) -> TrainingTally {
        let mut t = TrainingTally::new();
        for i in 0..n {
            for _ in 0..10 {
                t.record("zz", &format!("cat{:02}", i));
            }
        }
        for c in ["adult.artnudes", "childfriendly", "government"] {
            t.record("zz", c);
        }
        t
    }

    fn add(t: &mut TrainingTally, lang: &str, category: &str, count: u64) {
        for _ in 0..count {
            t.record(lang, category);
        }
    }

    #[test]
    fn maturity_is_ordered() {
        assert!(Maturity::Zilch < Maturity::Prealpha);
        assert!(Maturity::Prealpha3 < Maturity::Alpha);
        assert!(Maturity::Beta2 < Maturity::Beta3);
        assert_eq!(Maturity::Prealpha2.to_string(), "prealpha2");
    }

    #[test]
    fn full_coverage_high_volume_is_beta3() {
        let mut t = tally_with_categories(5);
        for i in 0..5 {
            add(&mut t, "en", &format!("cat{:02}", i), 8);
        }
        let a = assess("en", &t, &ReportSettings::default());
        assert_eq!(a.maturity, Maturity::Beta3);
        assert!(a.missing.is_empty());
        assert!(a.coverage.is_none());
    }

    #[test]
    fn volume_ladder_rungs() {
        let cases = [
            (1, Maturity::Alpha),
            (2, Maturity::Alpha2),
            (3, Maturity::Alpha2),
            (4, Maturity::Beta),
            (6, Maturity::Beta),
            (7, Maturity::Beta2),
            (8, Maturity::Beta3),
        ];
        for (count, expected) in cases {
            let mut t = tally_with_categories(2);
            add(&mut t, "en", "cat00", 100);
            add(&mut t, "en", "cat01", count);
            let a = assess("en", &t, &ReportSettings::default());
            assert_eq!(a.maturity, expected, "count {}", count);
        }
    }

    #[test]
    fn lowest_category_decides_volume() {
        let mut t = tally_with_categories(3);
        add(&mut t, "en", "cat00", 1);
        add(&mut t, "en", "cat01", 7);
        add(&mut t, "en", "cat02", 100);
        assert_eq!(assess("en", &t, &ReportSettings::default()).maturity, Maturity::Alpha);
    }

    #[test]
    fn non_maturity_categories_do_not_lower_volume() {
        let mut t = tally_with_categories(2);
        add(&mut t, "en", "cat00", 50);
        add(&mut t, "en", "cat01", 50);
        add(&mut t, "en", "childfriendly", 1);
        assert_eq!(assess("en", &t, &ReportSettings::default()).maturity, Maturity::Beta3);
    }

    #[test]
    fn few_categories_low_coverage_is_zilch() {
        let mut t = tally_with_categories(37);
        add(&mut t, "en", "cat00", 50);
        add(&mut t, "en", "cat01", 50);
        let a = assess("en", &t, &ReportSettings::default());
        assert_eq!(a.maturity, Maturity::Zilch);
        assert!(a.missing.is_empty());
    }

    #[test]
    fn low_coverage_is_prealpha() {
        // 3 of 10 trainable categories: 0.30, not below 0.1
        let mut t = tally_with_categories(10);
        for i in 0..3 {
            add(&mut t, "en", &format!("cat{:02}", i), 50);
        }
        assert_eq!(assess("en", &t, &ReportSettings::default()).maturity, Maturity::Prealpha);
    }

    #[test]
    fn partial_coverage_lists_missing_categories() {
        // 4 of 10: prealpha2, every absent category listed
        let mut t = tally_with_categories(10);
        for i in 0..4 {
            add(&mut t, "en", &format!("cat{:02}", i), 50);
        }
        let a = assess("en", &t, &ReportSettings::default());
        assert_eq!(a.maturity, Maturity::Prealpha2);
        assert_eq!(a.missing.len(), 13 - 4);
        assert!(a.missing.contains(&"cat09".to_string()));
        assert!(a.missing.contains(&"government".to_string()));
        assert!((a.coverage.unwrap() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn coverage_ladder_rungs() {
        let cases = [
            (5, Maturity::Prealpha3),
            (6, Maturity::Prealpha3),
            (7, Maturity::Alpha),
            (8, Maturity::Alpha2),
            (9, Maturity::Alpha3),
        ];
        for (covered, expected) in cases {
            let mut t = tally_with_categories(10);
            for i in 0..covered {
                add(&mut t, "en", &format!("cat{:02}", i), 50);
            }
            let a = assess("en", &t, &ReportSettings::default());
            assert_eq!(a.maturity, expected, "covered {}", covered);
            assert_eq!(a.missing.len(), 13 - covered);
        }
    }

    #[test]
    fn coverage_overrides_volume() {
        // thin samples, but 9 of 10 categories: coverage rating wins
        let mut t = tally_with_categories(10);
        for i in 0..9 {
            add(&mut t, "en", &format!("cat{:02}", i), 1);
        }
        assert_eq!(assess("en", &t, &ReportSettings::default()).maturity, Maturity::Alpha3);
    }

    #[test]
    fn unknown_language_rates_low() {
        let t = tally_with_categories(10);
        let a = assess("xx", &t, &ReportSettings::default());
        assert_eq!(a.maturity, Maturity::Zilch);
    }
}

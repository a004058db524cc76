//! Scoring bands for the evaluation rubric
//!
//! Every evaluation item is scored 1 to 4, so a rubric with N items has a
//! total between N and 4N. The bands below split that total into four levels.
//! The thresholds are kept exactly as they have always been printed on the
//! rubric, which means neighbouring bands share a boundary (`3×(N−1)` is both
//! the top of "good" and the bottom of "excellent") and, for very small N, a
//! band can run backwards. [`ScoreBands::is_well_ordered`] reports this.

use std::fmt;

use crate::error::{CoreError, Result};

/// The four score levels, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreLevel {
    /// All levels in display order
    pub const ALL: [ScoreLevel; 4] = [
        ScoreLevel::Excellent,
        ScoreLevel::Good,
        ScoreLevel::Fair,
        ScoreLevel::NeedsImprovement,
    ];

    /// Label as printed on the rubric
    pub fn label(self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "優良",
            ScoreLevel::Good => "良好",
            ScoreLevel::Fair => "尚可",
            ScoreLevel::NeedsImprovement => "待加強",
        }
    }

    /// Per-item score of this level
    pub fn item_score(self) -> u32 {
        match self {
            ScoreLevel::Excellent => 4,
            ScoreLevel::Good => 3,
            ScoreLevel::Fair => 2,
            ScoreLevel::NeedsImprovement => 1,
        }
    }

    /// What a total in this band says about the student
    pub fn meaning(self) -> &'static str {
        match self {
            ScoreLevel::Excellent => "表示學生能充分掌握技巧並理解其重要性。",
            ScoreLevel::Good => "表示學生能較好地完成步驟，但仍有待改進的部分。",
            ScoreLevel::Fair => "表示學生能完成部分步驟，但正確性和時間效率需加強。",
            ScoreLevel::NeedsImprovement => "表示學生需更多練習和輔助以掌握技巧。",
        }
    }

    /// Rubric column header, e.g. `優良（4分）`
    pub fn column_header(self) -> String {
        format!("{}（{}分）", self.label(), self.item_score())
    }
}

/// Total-score range of one band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRange {
    /// A single total
    Single(i64),
    /// An inclusive `low-high` range, printed as-is even when `low > high`
    Range { low: i64, high: i64 },
}

impl ScoreRange {
    /// Whether `low <= high` (always true for a single value)
    pub fn is_ascending(&self) -> bool {
        match *self {
            ScoreRange::Single(_) => true,
            ScoreRange::Range { low, high } => low <= high,
        }
    }

    /// Lowest printed value
    pub fn low(&self) -> i64 {
        match *self {
            ScoreRange::Single(v) => v,
            ScoreRange::Range { low, .. } => low,
        }
    }

    /// Highest printed value
    pub fn high(&self) -> i64 {
        match *self {
            ScoreRange::Single(v) => v,
            ScoreRange::Range { high, .. } => high,
        }
    }
}

impl fmt::Display for ScoreRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreRange::Single(v) => write!(f, "{}", v),
            ScoreRange::Range { low, high } => write!(f, "{}-{}", low, high),
        }
    }
}

/// One band: a level and its total-score range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand {
    pub level: ScoreLevel,
    pub range: ScoreRange,
}

impl ScoreBand {
    /// The rubric line, e.g. `優良：9-16 分，表示學生能充分掌握技巧並理解其重要性。`
    pub fn line(&self) -> String {
        format!(
            "{}：{} 分，{}",
            self.level.label(),
            self.range,
            self.level.meaning()
        )
    }
}

/// The four bands for a rubric of `item_count` items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBands {
    pub item_count: usize,
    pub excellent: ScoreBand,
    pub good: ScoreBand,
    pub fair: ScoreBand,
    pub needs_improvement: ScoreBand,
}

impl ScoreBands {
    /// Bands best first
    pub fn bands(&self) -> [ScoreBand; 4] {
        [self.excellent, self.good, self.fair, self.needs_improvement]
    }

    /// Band of a given level
    pub fn band(&self, level: ScoreLevel) -> ScoreBand {
        match level {
            ScoreLevel::Excellent => self.excellent,
            ScoreLevel::Good => self.good,
            ScoreLevel::Fair => self.fair,
            ScoreLevel::NeedsImprovement => self.needs_improvement,
        }
    }

    /// Rubric lines, best first
    pub fn lines(&self) -> Vec<String> {
        self.bands().iter().map(ScoreBand::line).collect()
    }

    /// Whether every band is ascending and strictly below the next better one.
    ///
    /// Excellent and good always share `3×(N−1)`, so this is currently false
    /// for every N.
    pub fn is_well_ordered(&self) -> bool {
        let bands = self.bands();
        bands.iter().all(|b| b.range.is_ascending())
            && bands
                .windows(2)
                .all(|pair| pair[1].range.high() < pair[0].range.low())
    }
}

/// Compute the scoring bands for `item_count` evaluation items.
///
/// | level | range |
/// |---|---|
/// | excellent | `3×(N−1)` – `4×N` |
/// | good | `2×N` – `3×(N−1)` |
/// | fair | `N` – `2×(N−1)` |
/// | needs improvement | `N−1` |
pub fn score_bands(item_count: usize) -> Result<ScoreBands> {
    if item_count == 0 {
        return Err(CoreError::InvalidItemCount(item_count));
    }
    let n = item_count as i64;
    let band = |level, low, high| ScoreBand {
        level,
        range: ScoreRange::Range { low, high },
    };
    Ok(ScoreBands {
        item_count,
        excellent: band(ScoreLevel::Excellent, 3 * (n - 1), 4 * n),
        good: band(ScoreLevel::Good, 2 * n, 3 * (n - 1)),
        fair: band(ScoreLevel::Fair, n, 2 * (n - 1)),
        needs_improvement: ScoreBand {
            level: ScoreLevel::NeedsImprovement,
            range: ScoreRange::Single(n - 1),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_items_rejected() {
        assert!(matches!(
            score_bands(0),
            Err(CoreError::InvalidItemCount(0))
        ));
    }

    #[test]
    fn test_four_items() {
        let bands = score_bands(4).unwrap();
        assert_eq!(bands.excellent.range.to_string(), "9-16");
        assert_eq!(bands.good.range.to_string(), "8-9");
        assert_eq!(bands.fair.range.to_string(), "4-6");
        assert_eq!(bands.needs_improvement.range.to_string(), "3");
    }

    #[test]
    fn test_single_item_prints_descending_ranges() {
        let bands = score_bands(1).unwrap();
        assert_eq!(bands.excellent.range.to_string(), "0-4");
        assert_eq!(bands.good.range.to_string(), "2-0");
        assert_eq!(bands.fair.range.to_string(), "1-0");
        assert_eq!(bands.needs_improvement.range.to_string(), "0");
        assert!(!bands.good.range.is_ascending());
    }

    #[test]
    fn test_formulas_hold_for_many_counts() {
        for n in 1..=200usize {
            let bands = score_bands(n).unwrap();
            let n = n as i64;
            assert_eq!(bands.excellent.range.low(), 3 * (n - 1));
            assert_eq!(bands.excellent.range.high(), 4 * n);
            assert_eq!(bands.good.range.low(), 2 * n);
            assert_eq!(bands.good.range.high(), 3 * (n - 1));
            assert_eq!(bands.fair.range.low(), n);
            assert_eq!(bands.fair.range.high(), 2 * (n - 1));
            assert_eq!(bands.needs_improvement.range, ScoreRange::Single(n - 1));
            // Excellent and good always meet at 3(N-1)
            assert!(!bands.is_well_ordered());
        }
    }

    #[test]
    fn test_lines() {
        let lines = score_bands(4).unwrap().lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "優良：9-16 分，表示學生能充分掌握技巧並理解其重要性。"
        );
        assert!(lines[3].starts_with("待加強：3 分，"));
    }

    #[test]
    fn test_column_headers() {
        let headers: Vec<String> = ScoreLevel::ALL.iter().map(|l| l.column_header()).collect();
        assert_eq!(
            headers,
            vec!["優良（4分）", "良好（3分）", "尚可（2分）", "待加強（1分）"]
        );
    }
}

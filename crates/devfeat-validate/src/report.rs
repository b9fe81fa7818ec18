//! Validation report types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A required file or directory is missing.
    Structural,
    /// A document does not parse, or a required field is absent or malformed.
    Schema,
    /// A best-practice heuristic is not met.
    Advisory,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// What class of problem this is.
    pub kind: FindingKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of validating one feature directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The feature id the directory was checked against.
    pub feature: String,
    /// Fatal findings, in check order. Non-empty means the feature is invalid.
    pub errors: Vec<Finding>,
    /// Advisory findings, in check order. Never block packaging.
    pub warnings: Vec<Finding>,
}

impl ValidationReport {
    /// An empty report for `feature`.
    #[must_use]
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            ..Self::default()
        }
    }

    /// Record a fatal finding.
    pub fn error(&mut self, kind: FindingKind, message: impl Into<String>) {
        self.errors.push(Finding {
            kind,
            message: message.into(),
        });
    }

    /// Record an advisory finding.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(Finding {
            kind: FindingKind::Advisory,
            message: message.into(),
        });
    }

    /// Whether the report has no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Counts folded over many reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Features checked.
    pub features: usize,
    /// Features with at least one error.
    pub failed: usize,
    /// Total errors.
    pub errors: usize,
    /// Total warnings.
    pub warnings: usize,
}

impl ValidationSummary {
    /// Fold a sequence of reports into one summary.
    #[must_use]
    pub fn fold<'a>(reports: impl IntoIterator<Item = &'a ValidationReport>) -> Self {
        reports.into_iter().fold(Self::default(), |acc, report| Self {
            features: acc.features.saturating_add(1),
            failed: acc
                .failed
                .saturating_add(usize::from(!report.is_valid())),
            errors: acc.errors.saturating_add(report.error_count()),
            warnings: acc.warnings.saturating_add(report.warning_count()),
        })
    }

    /// Whether every folded report was valid.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new("hello");
        assert!(report.is_valid());
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut report = ValidationReport::new("hello");
        report.warning("README.md is missing");
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].kind, FindingKind::Advisory);
    }

    #[test]
    fn test_fold_counts() {
        let mut bad = ValidationReport::new("bad");
        bad.error(FindingKind::Structural, "install.sh is missing");
        bad.error(FindingKind::Schema, "missing version");
        bad.warning("README.md is missing");

        let mut good = ValidationReport::new("good");
        good.warning("no set -e");

        let summary = ValidationSummary::fold([&bad, &good]);
        assert_eq!(
            summary,
            ValidationSummary {
                features: 2,
                failed: 1,
                errors: 2,
                warnings: 2,
            }
        );
        assert!(!summary.is_success());
    }

    #[test]
    fn test_fold_empty() {
        let summary = ValidationSummary::fold(std::iter::empty());
        assert_eq!(summary, ValidationSummary::default());
        assert!(summary.is_success());
    }

    #[test]
    fn test_finding_serializes_kind() {
        let finding = Finding {
            kind: FindingKind::Schema,
            message: "bad".into(),
        };
        let json = serde_json::to_string(&finding).unwrap();
        assert_eq!(json, r#"{"kind":"schema","message":"bad"}"#);
    }
}

//! Detection Summary
//!
//! Aggregate counts over one detection run, for dashboards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::detector::partition_reports;
use super::types::{Detection, Report, Severity};

/// Counts over the input and output of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub total_reports: usize,
    pub valid_reports: usize,
    pub skipped_reports: usize,
    pub clustered_reports: usize,
    pub unclustered_reports: usize,
    pub hotspot_count: usize,
    pub max_score: f64,
    /// Valid reports per severity; every severity is present
    pub severity_distribution: BTreeMap<Severity, usize>,
}

impl DetectionSummary {
    /// `detection` must have been produced from `reports`
    pub fn from_detection(reports: &[Report], detection: &Detection) -> Self {
        let (candidates, _) = partition_reports(reports);

        let mut severity_distribution: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        for candidate in &candidates {
            *severity_distribution.entry(candidate.report.severity).or_insert(0) += 1;
        }

        let valid_reports = candidates.len();
        let clustered_reports = detection.clustered_count();

        let max_score = detection
            .hotspots
            .iter()
            .map(|h| h.score)
            .fold(0.0_f64, f64::max);

        Self {
            total_reports: reports.len(),
            valid_reports,
            skipped_reports: detection.warnings.len(),
            clustered_reports,
            unclustered_reports: valid_reports.saturating_sub(clustered_reports),
            hotspot_count: detection.hotspots.len(),
            max_score,
            severity_distribution,
        }
    }

    /// Count entries that never became a `Report` as skipped input
    pub fn with_unparsed(mut self, count: usize) -> Self {
        self.total_reports += count;
        self.skipped_reports += count;
        self
    }
}

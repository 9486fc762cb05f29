//! Hotspot Detector
//!
//! Greedy single-linkage radius clustering over validated reports.
//! Input: reports + radius (km)
//! Output: Detection (hotspots in formation order + per-report warnings)
//!
//! Seeds are taken in input order. Each unclaimed seed collects every other
//! unclaimed report within the radius (inclusive); a group of two or more
//! becomes a hotspot and all of its members are claimed. A seed with no
//! neighbor forms nothing.
//!
//! ## Known limitation
//! When neighborhoods chain (A-B and B-C within radius, A-C not), the
//! result depends on which report seeds first: `[A, B, C]` yields {A, B}
//! while `[B, A, C]` yields {A, B, C}. Groups whose diameter is within the
//! radius are unaffected by ordering.

use std::collections::HashSet;

use super::error::HotspotError;
use super::geo::{centroid, haversine_km};
use super::rules::{SeverityWeights, MIN_REPORTS_FOR_HOTSPOT};
use super::types::{Detection, GeoPoint, Hotspot, Report, ReportWarning, WarningReason};

// ============================================================================
// MAIN DETECTION FUNCTION
// ============================================================================

/// Detect hotspots with the default severity weights.
pub fn detect_hotspots(reports: &[Report], radius_km: f64) -> Result<Detection, HotspotError> {
    detect_hotspots_with_weights(reports, radius_km, &SeverityWeights::default())
}

/// Detect hotspots with caller-chosen severity weights.
pub fn detect_hotspots_with_weights(
    reports: &[Report],
    radius_km: f64,
    weights: &SeverityWeights,
) -> Result<Detection, HotspotError> {
    validate_radius(radius_km)?;
    if !weights.is_valid() {
        return Err(HotspotError::invalid(
            "weights",
            "severity weights must be finite and non-negative",
        ));
    }

    let (candidates, warnings) = partition_reports(reports);
    let mut detection = Detection {
        hotspots: Vec::new(),
        warnings,
    };

    if candidates.len() < MIN_REPORTS_FOR_HOTSPOT {
        return Ok(detection);
    }

    let mut claimed = vec![false; candidates.len()];

    for seed in 0..candidates.len() {
        if claimed[seed] {
            continue;
        }

        let origin = &candidates[seed].report.location;
        let mut group = vec![seed];
        group.extend((0..candidates.len()).filter(|&other| {
            other != seed
                && !claimed[other]
                && haversine_km(origin, &candidates[other].report.location) <= radius_km
        }));

        if group.len() < MIN_REPORTS_FOR_HOTSPOT {
            continue;
        }

        for &idx in &group {
            claimed[idx] = true;
        }

        detection
            .hotspots
            .push(build_hotspot(&candidates, &group, radius_km, weights));
    }

    Ok(detection)
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate_radius(radius_km: f64) -> Result<(), HotspotError> {
    if !radius_km.is_finite() {
        return Err(HotspotError::invalid("radius_km", "must be a finite number"));
    }
    if radius_km <= 0.0 {
        return Err(HotspotError::invalid(
            "radius_km",
            format!("must be positive, got {}", radius_km),
        ));
    }
    Ok(())
}

/// A report that passed validation, with its confidence clamped
pub(super) struct Candidate<'a> {
    pub(super) report: &'a Report,
    pub(super) confidence: f64,
}

/// Why a report cannot be clustered, if any
fn check_report(report: &Report) -> Option<WarningReason> {
    let GeoPoint { lat, lon } = report.location;

    if !lat.is_finite() || !lon.is_finite() {
        return Some(WarningReason::NonFiniteCoordinate);
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Some(WarningReason::LatitudeOutOfRange);
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Some(WarningReason::LongitudeOutOfRange);
    }
    if !report.confidence.is_finite() || !(0.0..=1.0).contains(&report.confidence) {
        return Some(WarningReason::ConfidenceOutOfRange);
    }
    None
}

/// Split input into usable candidates and warnings, both in input order
pub(super) fn partition_reports(reports: &[Report]) -> (Vec<Candidate<'_>>, Vec<ReportWarning>) {
    let mut candidates = Vec::with_capacity(reports.len());
    let mut warnings = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(reports.len());

    for report in reports {
        let reason = check_report(report).or_else(|| {
            (!seen.insert(report.id.as_str())).then_some(WarningReason::DuplicateId)
        });

        match reason {
            Some(reason) => warnings.push(ReportWarning {
                report_id: report.id.clone(),
                reason,
            }),
            None => candidates.push(Candidate {
                report,
                confidence: report.confidence.clamp(0.0, 1.0),
            }),
        }
    }

    (candidates, warnings)
}

// ============================================================================
// SCORING
// ============================================================================

/// `group` is non-empty and starts with the seed
fn build_hotspot(
    candidates: &[Candidate<'_>],
    group: &[usize],
    radius_km: f64,
    weights: &SeverityWeights,
) -> Hotspot {
    let seed = candidates[group[0]].report;
    let members = group.iter().map(|&i| &candidates[i]);

    let center = centroid(members.clone().map(|c| &c.report.location)).unwrap_or(seed.location);

    let score: f64 = members
        .clone()
        .map(|c| weights.weight(c.report.severity) * c.confidence)
        .sum();

    let confidence_sum: f64 = members.clone().map(|c| c.confidence).sum();

    let peak_severity = members
        .clone()
        .map(|c| c.report.severity)
        .max()
        .unwrap_or(seed.severity);

    let (first_reported, last_reported) = members.clone().fold(
        (seed.timestamp, seed.timestamp),
        |(first, last), c| (first.min(c.report.timestamp), last.max(c.report.timestamp)),
    );

    Hotspot {
        center,
        members: members.map(|c| c.report.id.clone()).collect(),
        score,
        radius_meters: radius_km * 1000.0,
        peak_severity,
        mean_confidence: confidence_sum / group.len() as f64,
        first_reported,
        last_reported,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::hotspot::types::Severity;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::BTreeSet;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap()
    }

    fn report(id: &str, lat: f64, lon: f64, severity: Severity, confidence: f64) -> Report {
        Report::new(id, lat, lon, severity, confidence, base_time())
    }

    fn member_sets(detection: &Detection) -> BTreeSet<BTreeSet<String>> {
        detection
            .hotspots
            .iter()
            .map(|h| h.members.iter().cloned().collect())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let detection = detect_hotspots(&[], 10.0).unwrap();
        assert!(detection.hotspots.is_empty());
        assert!(detection.warnings.is_empty());
    }

    #[test]
    fn test_single_report() {
        let reports = vec![report("r1", 13.0827, 80.2707, Severity::High, 0.9)];
        let detection = detect_hotspots(&reports, 10.0).unwrap();
        assert!(detection.hotspots.is_empty());
    }

    #[test]
    fn test_two_nearby_reports_form_one_hotspot() {
        let reports = vec![
            report("a", 13.0827, 80.2707, Severity::High, 0.9),
            report("b", 13.09, 80.28, Severity::Medium, 0.8),
        ];
        let detection = detect_hotspots(&reports, 5.0).unwrap();

        assert_eq!(detection.hotspots.len(), 1);
        assert_eq!(detection.hotspots[0].members, vec!["a", "b"]);
    }

    #[test]
    fn test_boundary_distance_is_inclusive() {
        let a = report("a", 13.0, 80.0, Severity::Low, 1.0);
        let b = report("b", 13.05, 80.03, Severity::Low, 1.0);
        let d = haversine_km(&a.location, &b.location);
        let reports = vec![a, b];

        let at_boundary = detect_hotspots(&reports, d).unwrap();
        assert_eq!(at_boundary.hotspots.len(), 1);

        let just_short = detect_hotspots(&reports, d - 1e-9).unwrap();
        assert!(just_short.hotspots.is_empty());
    }

    #[test]
    fn test_adding_critical_report_increases_score() {
        let mut reports = vec![
            report("a", 13.0827, 80.2707, Severity::High, 0.9),
            report("b", 13.09, 80.28, Severity::Medium, 0.8),
        ];
        let before = detect_hotspots(&reports, 10.0).unwrap();

        reports.push(report("c", 13.085, 80.275, Severity::Critical, 1.0));
        let after = detect_hotspots(&reports, 10.0).unwrap();

        assert_eq!(after.hotspots.len(), 1);
        assert_eq!(after.hotspots[0].members.len(), 3);
        assert!(after.hotspots[0].score > before.hotspots[0].score);
        assert!((after.hotspots[0].score - before.hotspots[0].score - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_shuffled_input_keeps_member_groups() {
        let reports = vec![
            report("chennai-1", 13.0827, 80.2707, Severity::High, 0.9),
            report("mumbai-1", 19.07, 72.88, Severity::Medium, 0.7),
            report("kochi-1", 9.9312, 76.2673, Severity::Low, 0.6),
            report("chennai-2", 13.09, 80.28, Severity::Medium, 0.8),
            report("vizag-1", 17.6868, 83.2185, Severity::Critical, 0.95),
            report("mumbai-2", 19.075, 72.885, Severity::High, 0.85),
            report("kochi-2", 9.94, 76.27, Severity::High, 0.5),
            report("mumbai-3", 19.065, 72.878, Severity::Low, 0.4),
        ];
        let expected = member_sets(&detect_hotspots(&reports, 10.0).unwrap());
        assert_eq!(expected.len(), 3);

        for shift in 1..reports.len() {
            let mut rotated = reports.clone();
            rotated.rotate_left(shift);
            let got = member_sets(&detect_hotspots(&rotated, 10.0).unwrap());
            assert_eq!(got, expected, "rotation by {}", shift);
        }

        let mut reversed = reports.clone();
        reversed.reverse();
        assert_eq!(member_sets(&detect_hotspots(&reversed, 10.0).unwrap()), expected);
    }

    #[test]
    fn test_chained_neighborhoods_depend_on_seed_order() {
        // 0.08° of latitude is ~8.9 km; a-c is ~17.8 km apart
        let a = report("a", 13.00, 80.0, Severity::Medium, 1.0);
        let b = report("b", 13.08, 80.0, Severity::Medium, 1.0);
        let c = report("c", 13.16, 80.0, Severity::Medium, 1.0);

        let from_end = detect_hotspots(&[a.clone(), b.clone(), c.clone()], 10.0).unwrap();
        assert_eq!(from_end.hotspots.len(), 1);
        assert_eq!(from_end.hotspots[0].members, vec!["a", "b"]);

        let from_middle = detect_hotspots(&[b, a, c], 10.0).unwrap();
        assert_eq!(from_middle.hotspots.len(), 1);
        assert_eq!(from_middle.hotspots[0].members, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_invalid_radius() {
        let reports = vec![
            report("a", 13.0827, 80.2707, Severity::High, 0.9),
            report("b", 13.09, 80.28, Severity::Medium, 0.8),
        ];

        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = detect_hotspots(&reports, radius).unwrap_err();
            assert!(matches!(err, HotspotError::InvalidParameter { name: "radius_km", .. }));
        }
    }

    #[test]
    fn test_invalid_radius_on_empty_input() {
        assert!(detect_hotspots(&[], 0.0).is_err());
    }

    #[test]
    fn test_coastal_scenario() {
        let reports = vec![
            report("chennai-a", 13.0827, 80.2707, Severity::High, 0.9),
            report("chennai-b", 13.09, 80.28, Severity::Medium, 0.8),
            report("mumbai", 19.07, 72.88, Severity::High, 0.95),
        ];
        let detection = detect_hotspots(&reports, 10.0).unwrap();

        assert_eq!(detection.hotspots.len(), 1);
        let hotspot = &detection.hotspots[0];
        assert_eq!(hotspot.members, vec!["chennai-a", "chennai-b"]);
        assert!(!hotspot.contains("mumbai"));
        assert!((hotspot.score - (3.0 * 0.9 + 2.0 * 0.8)).abs() < 1e-9);
        assert_eq!(hotspot.radius_meters, 10_000.0);
        assert!((hotspot.center.lat - (13.0827 + 13.09) / 2.0).abs() < 1e-12);
        assert!((hotspot.center.lon - (80.2707 + 80.28) / 2.0).abs() < 1e-12);
        assert_eq!(hotspot.peak_severity, Severity::High);
        assert!((hotspot.mean_confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_reports_become_warnings() {
        let reports = vec![
            report("ok-1", 13.0827, 80.2707, Severity::High, 0.9),
            report("nan", f64::NAN, 80.27, Severity::High, 0.9),
            report("north", 91.0, 80.27, Severity::High, 0.9),
            report("east", 13.08, 181.0, Severity::High, 0.9),
            report("overconfident", 13.08, 80.27, Severity::High, 1.2),
            report("ok-2", 13.09, 80.28, Severity::Medium, 0.8),
        ];
        let detection = detect_hotspots(&reports, 10.0).unwrap();

        assert_eq!(detection.hotspots.len(), 1);
        assert_eq!(detection.hotspots[0].members, vec!["ok-1", "ok-2"]);

        let reasons: Vec<(&str, WarningReason)> = detection
            .warnings
            .iter()
            .map(|w| (w.report_id.as_str(), w.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("nan", WarningReason::NonFiniteCoordinate),
                ("north", WarningReason::LatitudeOutOfRange),
                ("east", WarningReason::LongitudeOutOfRange),
                ("overconfident", WarningReason::ConfidenceOutOfRange),
            ]
        );
    }

    #[test]
    fn test_only_one_valid_report_left() {
        let reports = vec![
            report("ok", 13.0827, 80.2707, Severity::High, 0.9),
            report("bad", 13.09, f64::NEG_INFINITY, Severity::High, 0.9),
        ];
        let detection = detect_hotspots(&reports, 10.0).unwrap();
        assert!(detection.hotspots.is_empty());
        assert_eq!(detection.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_id_is_skipped() {
        let reports = vec![
            report("dup", 13.0827, 80.2707, Severity::High, 0.9),
            report("dup", 13.09, 80.28, Severity::Medium, 0.8),
            report("other", 13.085, 80.275, Severity::Low, 0.5),
        ];
        let detection = detect_hotspots(&reports, 10.0).unwrap();

        assert_eq!(detection.hotspots[0].members, vec!["dup", "other"]);
        assert_eq!(
            detection.warnings,
            vec![ReportWarning {
                report_id: "dup".to_string(),
                reason: WarningReason::DuplicateId,
            }]
        );
    }

    #[test]
    fn test_isolated_seed_does_not_block_later_clusters() {
        let reports = vec![
            report("lonely", 19.07, 72.88, Severity::Critical, 1.0),
            report("a", 13.0827, 80.2707, Severity::Low, 0.5),
            report("b", 13.09, 80.28, Severity::Low, 0.5),
        ];
        let detection = detect_hotspots(&reports, 10.0).unwrap();
        assert_eq!(detection.hotspots.len(), 1);
        assert_eq!(detection.hotspots[0].members, vec!["a", "b"]);
        assert_eq!(detection.clustered_count(), 2);
    }

    #[test]
    fn test_hotspots_in_formation_order() {
        let reports = vec![
            report("kochi-1", 9.9312, 76.2673, Severity::Low, 0.6),
            report("chennai-1", 13.0827, 80.2707, Severity::High, 0.9),
            report("chennai-2", 13.09, 80.28, Severity::Medium, 0.8),
            report("kochi-2", 9.94, 76.27, Severity::High, 0.5),
        ];
        let detection = detect_hotspots(&reports, 10.0).unwrap();

        assert_eq!(detection.hotspots.len(), 2);
        assert_eq!(detection.hotspots[0].members, vec!["kochi-1", "kochi-2"]);
        assert_eq!(detection.hotspots[1].members, vec!["chennai-1", "chennai-2"]);
    }

    #[test]
    fn test_zero_confidence_still_clusters() {
        let reports = vec![
            report("a", 13.0827, 80.2707, Severity::Critical, 0.0),
            report("b", 13.09, 80.28, Severity::Critical, 0.0),
        ];
        let detection = detect_hotspots(&reports, 10.0).unwrap();
        assert_eq!(detection.hotspots.len(), 1);
        assert_eq!(detection.hotspots[0].score, 0.0);
    }

    #[test]
    fn test_reporting_window() {
        let mut early = report("early", 13.0827, 80.2707, Severity::Low, 0.5);
        let mut late = report("late", 13.09, 80.28, Severity::Low, 0.5);
        early.timestamp = base_time();
        late.timestamp = base_time() + Duration::hours(3);

        let detection = detect_hotspots(&[late, early], 10.0).unwrap();
        let hotspot = &detection.hotspots[0];
        assert_eq!(hotspot.first_reported, base_time());
        assert_eq!(hotspot.last_reported, base_time() + Duration::hours(3));
    }

    #[test]
    fn test_custom_weights() {
        let reports = vec![
            report("a", 13.0827, 80.2707, Severity::Low, 1.0),
            report("b", 13.09, 80.28, Severity::Critical, 0.5),
        ];
        let weights = SeverityWeights {
            low: 0.5,
            medium: 1.0,
            high: 5.0,
            critical: 10.0,
        };
        let detection = detect_hotspots_with_weights(&reports, 10.0, &weights).unwrap();
        assert!((detection.hotspots[0].score - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = SeverityWeights {
            high: -3.0,
            ..Default::default()
        };
        let err = detect_hotspots_with_weights(&[], 10.0, &weights).unwrap_err();
        assert!(matches!(err, HotspotError::InvalidParameter { name: "weights", .. }));
    }
}

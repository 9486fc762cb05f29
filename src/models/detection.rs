//! Detection request/response model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::logic::alert::{AlertLevel, AlertThresholds};
use crate::logic::enrichment::{EnrichmentRollup, EnrichmentTable};
use crate::logic::filter::ReportFilter;
use crate::logic::hotspot::{DetectionSummary, Hotspot, Report, ReportWarning, WarningReason};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DetectRequest {
    /// Raw entries, read one at a time by `parse_reports` so a single bad
    /// entry does not reject the batch. Hard cap; the configured limit is
    /// usually tighter.
    #[serde(default)]
    #[validate(length(max = 100000))]
    pub reports: Vec<serde_json::Value>,

    /// Falls back to the configured default when absent
    #[validate(range(max = 20000.0))]
    pub radius_km: Option<f64>,

    #[serde(default)]
    pub filter: Option<ReportFilter>,

    #[serde(default)]
    pub enrichment: Option<EnrichmentTable>,
}

/// Read each raw entry as a `Report`.
///
/// Entries that do not fit the report shape (null or non-numeric
/// coordinates, unknown severity, missing fields) become
/// `MalformedReport` warnings in input order. The warning carries the
/// entry's `id` when it has a string one, else `#<index>`.
pub fn parse_reports(raw: Vec<serde_json::Value>) -> (Vec<Report>, Vec<ReportWarning>) {
    let mut reports = Vec::with_capacity(raw.len());
    let mut warnings = Vec::new();

    for (index, value) in raw.into_iter().enumerate() {
        let report_id = value
            .get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));

        match serde_json::from_value::<Report>(value) {
            Ok(report) => reports.push(report),
            Err(err) => {
                tracing::debug!("Unreadable report {}: {}", report_id, err);
                warnings.push(ReportWarning {
                    report_id,
                    reason: WarningReason::MalformedReport,
                });
            }
        }
    }

    (reports, warnings)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotView {
    #[serde(flatten)]
    pub hotspot: Hotspot,
    pub report_count: usize,
    pub alert_level: AlertLevel,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentRollup>,
}

impl HotspotView {
    pub fn new(
        hotspot: Hotspot,
        thresholds: &AlertThresholds,
        enrichment: Option<&EnrichmentTable>,
    ) -> Self {
        let alert_level = thresholds.classify(hotspot.score);
        Self {
            report_count: hotspot.members.len(),
            alert_level,
            color: alert_level.color().to_string(),
            enrichment: enrichment.map(|table| table.for_members(&hotspot.members)),
            hotspot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub detection_id: Uuid,
    pub radius_km: f64,
    pub hotspots: Vec<HotspotView>,
    /// Unreadable entries first, then reports skipped by the detector;
    /// surface as a dismissible notice
    pub warnings: Vec<ReportWarning>,
    /// Reports removed by the request filter before detection
    pub filtered_out: usize,
    pub summary: DetectionSummary,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::hotspot::{GeoPoint, Severity};
    use serde_json::json;

    fn hotspot(score: f64) -> Hotspot {
        Hotspot {
            center: GeoPoint::new(13.0, 80.0),
            members: vec!["a".to_string(), "b".to_string()],
            score,
            radius_meters: 10_000.0,
            peak_severity: Severity::High,
            mean_confidence: 0.9,
            first_reported: Utc::now(),
            last_reported: Utc::now(),
        }
    }

    #[test]
    fn test_view_applies_thresholds() {
        let view = HotspotView::new(hotspot(12.0), &AlertThresholds::default(), None);
        assert_eq!(view.alert_level, AlertLevel::Alert);
        assert_eq!(view.color, AlertLevel::Alert.color());
        assert_eq!(view.report_count, 2);
        assert!(view.enrichment.is_none());
    }

    #[test]
    fn test_view_serializes_flat() {
        let view = HotspotView::new(hotspot(3.0), &AlertThresholds::default(), None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["score"], 3.0);
        assert_eq!(json["alert_level"], "info");
        assert_eq!(json["radius_meters"], 10_000.0);
        assert!(json.get("enrichment").is_none());
    }

    #[test]
    fn test_parse_reports_keeps_good_entries() {
        let raw = vec![
            json!({
                "id": "ok",
                "location": { "lat": 13.08, "lon": 80.27 },
                "severity": "high",
                "confidence": 0.9,
                "timestamp": "2024-07-01T06:00:00Z"
            }),
            json!({
                "id": "null-lat",
                "location": { "lat": null, "lon": 80.27 },
                "severity": "high",
                "confidence": 0.9,
                "timestamp": "2024-07-01T06:00:00Z"
            }),
            json!({
                "id": "string-lat",
                "location": { "lat": "13.1", "lon": 80.27 },
                "severity": "low",
                "confidence": 0.5,
                "timestamp": "2024-07-01T06:00:00Z"
            }),
            json!({ "severity": "extreme" }),
        ];

        let (reports, warnings) = parse_reports(raw);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "ok");
        let ids: Vec<&str> = warnings.iter().map(|w| w.report_id.as_str()).collect();
        assert_eq!(ids, vec!["null-lat", "string-lat", "#3"]);
        assert!(warnings.iter().all(|w| w.reason == WarningReason::MalformedReport));
    }

    #[test]
    fn test_request_defaults() {
        let req: DetectRequest = serde_json::from_str("{}").unwrap();
        assert!(req.reports.is_empty());
        assert!(req.radius_km.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_huge_radius() {
        let req: DetectRequest = serde_json::from_str(r#"{"radius_km": 50000}"#).unwrap();
        assert!(req.validate().is_err());
    }
}

//! Hotspot Types
//!
//! Core data structures for hotspot detection.
//! No clustering logic here - only the shapes that flow in and out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// SEVERITY
// ============================================================================

/// Ordinal hazard-intensity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

// ============================================================================
// GEO POINT
// ============================================================================

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside [-90,90] x [-180,180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

// ============================================================================
// REPORT (input)
// ============================================================================

/// A single geotagged hazard report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub location: GeoPoint,
    pub severity: Severity,
    /// Caller-supplied reliability estimate, expected in [0, 1]
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl Report {
    pub fn new(
        id: impl Into<String>,
        lat: f64,
        lon: f64,
        severity: Severity,
        confidence: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            location: GeoPoint::new(lat, lon),
            severity,
            confidence,
            timestamp,
        }
    }
}

// ============================================================================
// HOTSPOT (output)
// ============================================================================

/// A spatial cluster of reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    /// Planar mean of member locations
    pub center: GeoPoint,
    /// Member report ids, seed first, then neighbors in input order
    pub members: Vec<String>,
    /// Sum of severity weight * confidence over members
    pub score: f64,
    /// Clustering radius echoed back in meters
    pub radius_meters: f64,
    pub peak_severity: Severity,
    pub mean_confidence: f64,
    pub first_reported: DateTime<Utc>,
    pub last_reported: DateTime<Utc>,
}

impl Hotspot {
    pub fn report_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, report_id: &str) -> bool {
        self.members.iter().any(|m| m == report_id)
    }
}

// ============================================================================
// WARNINGS (non-fatal, per report)
// ============================================================================

/// Why a report was left out of clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    NonFiniteCoordinate,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    ConfidenceOutOfRange,
    DuplicateId,
    /// Entry could not be read as a report at all
    MalformedReport,
}

impl WarningReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningReason::NonFiniteCoordinate => "non_finite_coordinate",
            WarningReason::LatitudeOutOfRange => "latitude_out_of_range",
            WarningReason::LongitudeOutOfRange => "longitude_out_of_range",
            WarningReason::ConfidenceOutOfRange => "confidence_out_of_range",
            WarningReason::DuplicateId => "duplicate_id",
            WarningReason::MalformedReport => "malformed_report",
        }
    }
}

impl std::fmt::Display for WarningReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A skipped report and the reason it was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    pub report_id: String,
    pub reason: WarningReason,
}

// ============================================================================
// DETECTION RESULT
// ============================================================================

/// Hotspots plus the reports that could not be used
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub hotspots: Vec<Hotspot>,
    pub warnings: Vec<ReportWarning>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    /// Number of reports that ended up in some hotspot
    pub fn clustered_count(&self) -> usize {
        self.hotspots.iter().map(|h| h.members.len()).sum()
    }
}

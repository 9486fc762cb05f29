//! Report Filter
//!
//! Caller-side narrowing of the report set before detection: severity,
//! confidence floor, reporting window and bounding box.
//!
//! Reports whose coordinates or confidence are malformed are passed through
//! untouched, so the detector still flags them as warnings instead of the
//! filter silently dropping them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hotspot::{GeoPoint, Report, Severity};

// ============================================================================
// BOUNDING BOX
// ============================================================================

/// Axis-aligned box in degrees. Boxes crossing the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, String> {
        let bbox = Self { west, south, east, north };
        bbox.validate()?;
        Ok(bbox)
    }

    fn validate(&self) -> Result<(), String> {
        let corners = [
            GeoPoint::new(self.south, self.west),
            GeoPoint::new(self.north, self.east),
        ];
        if !corners.iter().all(GeoPoint::is_valid) {
            return Err("bbox corners must be valid coordinates".to_string());
        }
        if self.south > self.north {
            return Err(format!("bbox south {} is above north {}", self.south, self.north));
        }
        if self.west > self.east {
            return Err(format!("bbox west {} is east of {}", self.west, self.east));
        }
        Ok(())
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lon)
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    /// Parses `west,south,east,north`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid bbox '{}': {}", s, e))?;

        match parts.as_slice() {
            [west, south, east, north] => BoundingBox::new(*west, *south, *east, *north),
            _ => Err(format!(
                "invalid bbox '{}': expected west,south,east,north",
                s
            )),
        }
    }
}

impl TryFrom<String> for BoundingBox {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoundingBox> for String {
    fn from(bbox: BoundingBox) -> Self {
        format!("{},{},{},{}", bbox.west, bbox.south, bbox.east, bbox.north)
    }
}

// ============================================================================
// REPORT FILTER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Exact severity match
    pub severity: Option<Severity>,
    /// Severity at or above
    pub min_severity: Option<Severity>,
    pub min_confidence: Option<f64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub bbox: Option<BoundingBox>,
}

impl ReportFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, report: &Report) -> bool {
        if let Some(severity) = self.severity {
            if report.severity != severity {
                return false;
            }
        }

        if let Some(min) = self.min_severity {
            if report.severity < min {
                return false;
            }
        }

        if let Some(min) = self.min_confidence {
            let judged = report.confidence.is_finite() && (0.0..=1.0).contains(&report.confidence);
            if judged && report.confidence < min {
                return false;
            }
        }

        if let Some(from) = self.date_from {
            if report.timestamp < from {
                return false;
            }
        }

        if let Some(to) = self.date_to {
            if report.timestamp > to {
                return false;
            }
        }

        if let Some(bbox) = &self.bbox {
            if report.location.is_valid() && !bbox.contains(&report.location) {
                return false;
            }
        }

        true
    }

    /// Matching reports, input order preserved
    pub fn apply(&self, reports: &[Report]) -> Vec<Report> {
        reports.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

//! Hotspot Scoring Rules
//!
//! Constants and weight tables used by the detector.
//! No clustering logic here.

use serde::{Deserialize, Serialize};

use super::types::Severity;

// ============================================================================
// GEODESY
// ============================================================================

/// Mean Earth radius in kilometers (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Fewer valid reports than this can never form a hotspot
pub const MIN_REPORTS_FOR_HOTSPOT: usize = 2;

// ============================================================================
// SEVERITY WEIGHTS
// ============================================================================

pub const LOW_WEIGHT: f64 = 1.0;
pub const MEDIUM_WEIGHT: f64 = 2.0;
pub const HIGH_WEIGHT: f64 = 3.0;
pub const CRITICAL_WEIGHT: f64 = 4.0;

/// Per-severity multipliers applied to confidence when scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            low: LOW_WEIGHT,
            medium: MEDIUM_WEIGHT,
            high: HIGH_WEIGHT,
            critical: CRITICAL_WEIGHT,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
        }
    }

    /// All weights finite and non-negative
    pub fn is_valid(&self) -> bool {
        [self.low, self.medium, self.high, self.critical]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

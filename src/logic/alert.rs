//! Alert Levels
//!
//! Maps a hotspot score onto the map overlay bands. The thresholds belong to
//! the caller; the detector never applies them.

use serde::{Deserialize, Serialize};

// ============================================================================
// ALERT LEVEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Alert,
    Emergency,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Alert => "alert",
            AlertLevel::Emergency => "emergency",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AlertLevel::Info => "#eab308",      // Yellow
            AlertLevel::Warning => "#f97316",   // Orange
            AlertLevel::Alert => "#ef4444",     // Red
            AlertLevel::Emergency => "#7f1d1d", // Dark red
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// THRESHOLDS
// ============================================================================

pub const WARNING_ABOVE: f64 = 5.0;
pub const ALERT_ABOVE: f64 = 10.0;
pub const EMERGENCY_ABOVE: f64 = 20.0;

/// Score bands; a score must be strictly above a bound to reach that level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub warning_above: f64,
    pub alert_above: f64,
    pub emergency_above: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning_above: WARNING_ABOVE,
            alert_above: ALERT_ABOVE,
            emergency_above: EMERGENCY_ABOVE,
        }
    }
}

impl AlertThresholds {
    pub fn classify(&self, score: f64) -> AlertLevel {
        if score > self.emergency_above {
            AlertLevel::Emergency
        } else if score > self.alert_above {
            AlertLevel::Alert
        } else if score > self.warning_above {
            AlertLevel::Warning
        } else {
            AlertLevel::Info
        }
    }

    /// Bounds must be finite, non-negative and strictly increasing
    pub fn validate(&self) -> Result<(), String> {
        let bounds = [self.warning_above, self.alert_above, self.emergency_above];
        if bounds.iter().any(|b| !b.is_finite() || *b < 0.0) {
            return Err("alert thresholds must be finite and non-negative".to_string());
        }
        if !(self.warning_above < self.alert_above && self.alert_above < self.emergency_above) {
            return Err(format!(
                "alert thresholds must increase: warning {} < alert {} < emergency {}",
                self.warning_above, self.alert_above, self.emergency_above
            ));
        }
        Ok(())
    }
}

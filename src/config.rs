//! Configuration module

use std::env;
use std::str::FromStr;

use crate::logic::alert::AlertThresholds;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Radius used when a request does not name one
    pub default_radius_km: f64,

    /// Largest radius a request may ask for
    pub max_radius_km: f64,

    /// Upper bound on reports in one detection request
    pub max_reports_per_request: usize,

    /// Score bands for map overlays
    pub alert_thresholds: AlertThresholds,

    /// Log output format (pretty, json); unset means json in production
    pub log_format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "development".to_string(),
            default_radius_km: 10.0,
            max_radius_km: 500.0,
            max_reports_per_request: 10_000,
            alert_thresholds: AlertThresholds::default(),
            log_format: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            default_radius_km: parse_var("DEFAULT_RADIUS_KM")
                .unwrap_or(defaults.default_radius_km),

            max_radius_km: parse_var("MAX_RADIUS_KM")
                .unwrap_or(defaults.max_radius_km),

            max_reports_per_request: parse_var("MAX_REPORTS_PER_REQUEST")
                .unwrap_or(defaults.max_reports_per_request),

            alert_thresholds: AlertThresholds {
                warning_above: parse_var("ALERT_WARNING_ABOVE")
                    .unwrap_or(defaults.alert_thresholds.warning_above),
                alert_above: parse_var("ALERT_ALERT_ABOVE")
                    .unwrap_or(defaults.alert_thresholds.alert_above),
                emergency_above: parse_var("ALERT_EMERGENCY_ABOVE")
                    .unwrap_or(defaults.alert_thresholds.emergency_above),
            },

            log_format: env::var("LOG_FORMAT")
                .ok()
                .or(defaults.log_format),
        }
    }

    /// Reject combinations the service cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if !(self.max_radius_km.is_finite() && self.max_radius_km > 0.0) {
            return Err(format!("MAX_RADIUS_KM must be positive, got {}", self.max_radius_km));
        }
        if !(self.default_radius_km > 0.0 && self.default_radius_km <= self.max_radius_km) {
            return Err(format!(
                "DEFAULT_RADIUS_KM must be in (0, {}], got {}",
                self.max_radius_km, self.default_radius_km
            ));
        }
        if self.max_reports_per_request == 0 {
            return Err("MAX_REPORTS_PER_REQUEST must be at least 1".to_string());
        }
        self.alert_thresholds.validate()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn json_logs(&self) -> bool {
        match &self.log_format {
            Some(format) => format.eq_ignore_ascii_case("json"),
            None => self.is_production(),
        }
    }

    /// Request body cap, sized so a full batch of reports plus their
    /// enrichment entries fits
    pub fn body_limit_bytes(&self) -> usize {
        self.max_reports_per_request
            .saturating_mul(BODY_BYTES_PER_REPORT)
            .saturating_add(BODY_BASE_BYTES)
    }
}

/// Generous per-report budget: one report entry plus one enrichment entry
pub const BODY_BYTES_PER_REPORT: usize = 1024;

/// Room for the filter and other request fields
pub const BODY_BASE_BYTES: usize = 64 * 1024;

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

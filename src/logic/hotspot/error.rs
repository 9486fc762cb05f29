//! Hotspot detection errors
//!
//! Only parameter problems are fatal. Bad individual reports are collected
//! as `ReportWarning`s on the `Detection` instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HotspotError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl HotspotError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        HotspotError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

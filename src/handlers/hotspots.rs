//! Hotspot handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, AppResult, AppError};
use crate::logic::alert::AlertThresholds;
use crate::logic::hotspot::{detect_hotspots, Detection, DetectionSummary, Report};
use crate::models::{parse_reports, DetectRequest, DetectResponse, HotspotView};

/// Above this many reports detection runs on the blocking pool
pub const BLOCKING_THRESHOLD: usize = 2_000;

/// Detect hotspots in a caller-supplied report set
pub async fn detect(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> AppResult<Json<DetectResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let config = &state.config;
    if req.reports.len() > config.max_reports_per_request {
        return Err(AppError::PayloadTooLarge(format!(
            "{} reports exceeds the limit of {}",
            req.reports.len(),
            config.max_reports_per_request
        )));
    }

    let radius_km = req.radius_km.unwrap_or(config.default_radius_km);
    if radius_km > config.max_radius_km {
        return Err(AppError::InvalidParameter(format!(
            "radius_km {} exceeds the maximum of {}",
            radius_km, config.max_radius_km
        )));
    }

    let DetectRequest { reports, filter, enrichment, .. } = req;
    let (reports, mut warnings) = parse_reports(reports);
    let unparsed = warnings.len();
    let submitted = reports.len();
    let reports = match &filter {
        Some(filter) if !filter.is_empty() => filter.apply(&reports),
        _ => reports,
    };
    let filtered_out = submitted - reports.len();

    let detection_id = Uuid::new_v4();
    let (reports, detection) = run_detection(reports, radius_km).await?;

    if unparsed + detection.warnings.len() > 0 {
        tracing::warn!(
            "Detection {}: skipped {} unreadable and {} invalid reports",
            detection_id,
            unparsed,
            detection.warnings.len()
        );
    }

    let summary = DetectionSummary::from_detection(&reports, &detection).with_unparsed(unparsed);
    tracing::debug!(
        "Detection {}: {} reports ({} filtered out), {} hotspots at {} km",
        detection_id,
        reports.len(),
        filtered_out,
        detection.hotspots.len(),
        radius_km
    );

    let Detection { hotspots, warnings: skipped } = detection;
    warnings.extend(skipped);
    let hotspots = hotspots
        .into_iter()
        .map(|h| HotspotView::new(h, &config.alert_thresholds, enrichment.as_ref()))
        .collect();

    Ok(Json(DetectResponse {
        detection_id,
        radius_km,
        hotspots,
        warnings,
        filtered_out,
        summary,
        generated_at: Utc::now(),
    }))
}

/// Score bands used to color hotspots
pub async fn alert_thresholds(State(state): State<AppState>) -> Json<AlertThresholds> {
    Json(state.config.alert_thresholds.clone())
}

/// Run small inputs inline; hand large ones to the blocking pool so the
/// O(n²) scan does not stall the runtime.
async fn run_detection(reports: Vec<Report>, radius_km: f64) -> AppResult<(Vec<Report>, Detection)> {
    if reports.len() <= BLOCKING_THRESHOLD {
        let detection = detect_hotspots(&reports, radius_km)?;
        return Ok((reports, detection));
    }

    let detection = tokio::task::spawn_blocking(move || {
        detect_hotspots(&reports, radius_km).map(|d| (reports, d))
    })
    .await??;

    Ok(detection)
}

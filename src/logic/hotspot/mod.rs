//! Hotspot Module
//!
//! Groups nearby hazard reports into scored spatial clusters.
//! Pure and synchronous: no I/O, no shared state, safe to call from any
//! thread. Each call recomputes everything from its input.
//!
//! ## Structure
//! - `types`: Report, Hotspot, Detection, warnings
//! - `rules`: Earth radius and severity weights
//! - `geo`: Haversine distance and centroid
//! - `detector`: Clustering and scoring
//! - `summary`: Aggregate counts for one run
//!
//! ## Usage
//! ```ignore
//! use oceaneye_hotspots::logic::hotspot::detect_hotspots;
//!
//! let detection = detect_hotspots(&reports, 10.0)?;
//! for hotspot in &detection.hotspots {
//!     println!("{} reports, score {:.2}", hotspot.members.len(), hotspot.score);
//! }
//! ```
//!
//! Detection is O(n²) in distance checks. A few thousand reports per region
//! finishes well under a second; larger volumes want a grid or tree index
//! in place of the nested scan.

pub mod types;
pub mod rules;
pub mod geo;
pub mod error;
pub mod detector;
pub mod summary;

pub use types::{
    Detection,
    GeoPoint,
    Hotspot,
    Report,
    ReportWarning,
    Severity,
    WarningReason,
};

pub use rules::{SeverityWeights, EARTH_RADIUS_KM};

pub use geo::{centroid, haversine_km};

pub use error::HotspotError;

pub use detector::{detect_hotspots, detect_hotspots_with_weights};

pub use summary::DetectionSummary;

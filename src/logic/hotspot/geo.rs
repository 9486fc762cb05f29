//! Great-circle distance and centroid helpers.

use super::rules::EARTH_RADIUS_KM;
use super::types::GeoPoint;

/// Haversine distance between two points, in kilometers.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Unweighted planar mean of latitudes and longitudes.
///
/// Not a spherical centroid: it drifts at high latitudes and breaks across
/// the antimeridian. Coastal India (5-25°N) is well inside the range where
/// the error is negligible next to a kilometer-scale radius.
pub fn centroid<'a, I>(points: I) -> Option<GeoPoint>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let mut count = 0usize;
    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;

    for p in points {
        count += 1;
        lat_sum += p.lat;
        lon_sum += p.lon;
    }

    if count == 0 {
        return None;
    }

    Some(GeoPoint::new(lat_sum / count as f64, lon_sum / count as f64))
}

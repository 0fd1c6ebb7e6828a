//! Elevation lookup and slope-based speed correction.

mod srtm;

use std::path::PathBuf;

pub use srtm::{parse_hgt_filename, tile_file_name, SrtmProvider, SrtmTile};

use crate::way::{EdgeGeometry, Way};

/// Coordinate to elevation in meters. `None` where no data exists.
pub trait ElevationProvider: Send + Sync {
    fn elevation(&self, lat: f64, lon: f64) -> Option<f64>;
}

#[derive(Debug, thiserror::Error)]
pub enum ElevationError {
    #[error("failed to read elevation tile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid elevation tile {path}: {reason}")]
    InvalidTile { path: PathBuf, reason: String },
}

/// Edges shorter than this keep their speed; the slope would be noise.
pub const MIN_CORRECTION_DISTANCE: f64 = 2.0;
/// Slopes at or below this count as flat.
pub const FLAT_SLOPE: f64 = 0.005;

/// Walking speed in km/h on a constant `slope`, kept within 1..=5.
///
/// Combines 5.4 km/h on the flat with 1 km/h of vertical progress:
/// `sqrt(1 + slope²) / (slope + 1/5.4)`.
pub fn slope_speed(slope: f64) -> f64 {
    ((1.0 + slope * slope).sqrt() / (slope + 1.0 / 5.4)).clamp(1.0, 5.0)
}

/// New forward speed for a hiking edge, or `None` to keep the stored one.
///
/// Only 3D geometry with a measurable incline is corrected. Tunnels,
/// bridges and steps are skipped since terrain elevation there does not
/// describe the walkway.
pub fn corrected_speed(way: &Way, edge: &impl EdgeGeometry) -> Option<f64> {
    if !edge.is_3d() || edge.point_count() < 2 {
        return None;
    }
    if way.has_tag("tunnel", "yes") || way.has_tag("bridge", "yes") || way.has_tag("highway", "steps") {
        return None;
    }

    let distance = edge.planar_distance();
    // Also rejects NaN
    if !(distance >= MIN_CORRECTION_DISTANCE) {
        return None;
    }

    let first = edge.elevation(0)?;
    let last = edge.elevation(edge.point_count() - 1)?;
    let slope = (last - first).abs() / distance;
    (slope > FLAT_SLOPE).then(|| slope_speed(slope))
}

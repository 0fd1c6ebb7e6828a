//! Way geometry: 2D or 3D point sequences.

use crate::elevation::ElevationProvider;

/// Haversine distance between two points in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();

    let a =
        (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// What the elevation corrector needs to know about an edge.
pub trait EdgeGeometry {
    fn point_count(&self) -> usize;

    fn is_3d(&self) -> bool;

    /// Elevation of point `index` in meters, `None` for 2D geometry or an
    /// index out of range.
    fn elevation(&self, index: usize) -> Option<f64>;

    /// Length ignoring elevation, in meters.
    fn planar_distance(&self) -> f64;
}

/// Sequence of lat/lon points, optionally with one elevation per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointList {
    lats: Vec<f64>,
    lons: Vec<f64>,
    eles: Option<Vec<f64>>,
}

impl PointList {
    pub fn from_2d(points: &[(f64, f64)]) -> Self {
        Self {
            lats: points.iter().map(|p| p.0).collect(),
            lons: points.iter().map(|p| p.1).collect(),
            eles: None,
        }
    }

    pub fn from_3d(points: &[(f64, f64, f64)]) -> Self {
        Self {
            lats: points.iter().map(|p| p.0).collect(),
            lons: points.iter().map(|p| p.1).collect(),
            eles: Some(points.iter().map(|p| p.2).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.lats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lats.is_empty()
    }

    pub fn lat(&self, index: usize) -> Option<f64> {
        self.lats.get(index).copied()
    }

    pub fn lon(&self, index: usize) -> Option<f64> {
        self.lons.get(index).copied()
    }

    pub fn is_closed(&self) -> bool {
        self.len() > 1
            && self.lats.first() == self.lats.last()
            && self.lons.first() == self.lons.last()
    }

    /// Copy of this geometry with elevations looked up per point.
    ///
    /// Points the provider has no data for get elevation 0. Existing
    /// elevations are replaced.
    pub fn with_elevation(&self, provider: &dyn ElevationProvider) -> Self {
        let eles = self
            .lats
            .iter()
            .zip(&self.lons)
            .map(|(lat, lon)| provider.elevation(*lat, *lon).unwrap_or(0.0))
            .collect();
        Self {
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            eles: Some(eles),
        }
    }
}

impl EdgeGeometry for PointList {
    fn point_count(&self) -> usize {
        self.len()
    }

    fn is_3d(&self) -> bool {
        self.eles.is_some()
    }

    fn elevation(&self, index: usize) -> Option<f64> {
        self.eles.as_ref()?.get(index).copied()
    }

    fn planar_distance(&self) -> f64 {
        self.lats
            .windows(2)
            .zip(self.lons.windows(2))
            .map(|(lat, lon)| haversine_distance(lat[0], lon[0], lat[1], lon[1]))
            .sum()
    }
}

/// Points of an edge together with a distance measured elsewhere, e.g. the
/// stored edge length of a graph.
#[derive(Debug, Clone, Copy)]
pub struct MeasuredEdge<'a> {
    pub points: &'a PointList,
    pub distance: f64,
}

impl EdgeGeometry for MeasuredEdge<'_> {
    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn is_3d(&self) -> bool {
        self.points.is_3d()
    }

    fn elevation(&self, index: usize) -> Option<f64> {
        self.points.elevation(index)
    }

    fn planar_distance(&self) -> f64 {
        self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl ElevationProvider for Constant {
        fn elevation(&self, lat: f64, _lon: f64) -> Option<f64> {
            (lat >= 0.0).then_some(self.0)
        }
    }

    #[test]
    fn test_haversine_sanity() {
        // One degree of latitude is about 111 km
        let d = haversine_distance(50.0, 4.0, 51.0, 4.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
        assert_eq!(haversine_distance(50.0, 4.0, 50.0, 4.0), 0.0);
    }

    #[test]
    fn test_planar_distance_ignores_elevation() {
        let flat = PointList::from_2d(&[(50.0, 4.0), (50.001, 4.0), (50.002, 4.0)]);
        let hilly = PointList::from_3d(&[(50.0, 4.0, 0.0), (50.001, 4.0, 500.0), (50.002, 4.0, 0.0)]);
        assert!(!flat.is_3d());
        assert!(hilly.is_3d());
        assert!((flat.planar_distance() - hilly.planar_distance()).abs() < 1e-9);
        assert!((flat.planar_distance() - 222.4).abs() < 1.0);
    }

    #[test]
    fn test_elevation_access() {
        let points = PointList::from_3d(&[(1.0, 1.0, 10.0), (1.0, 2.0, 20.0)]);
        assert_eq!(points.elevation(1), Some(20.0));
        assert_eq!(points.elevation(2), None);
        assert_eq!(PointList::from_2d(&[(1.0, 1.0)]).elevation(0), None);
    }

    #[test]
    fn test_with_elevation() {
        let points = PointList::from_2d(&[(10.0, 1.0), (-10.0, 1.0)]);
        let lifted = points.with_elevation(&Constant(250.0));
        assert!(lifted.is_3d());
        assert_eq!(lifted.elevation(0), Some(250.0));
        assert_eq!(lifted.elevation(1), Some(0.0));
    }

    #[test]
    fn test_measured_edge_overrides_distance() {
        let points = PointList::from_3d(&[(1.0, 1.0, 10.0), (1.0, 2.0, 11.0)]);
        let edge = MeasuredEdge {
            points: &points,
            distance: 100.0,
        };
        assert_eq!(edge.planar_distance(), 100.0);
        assert_eq!(edge.point_count(), 2);
        assert_eq!(edge.elevation(1), Some(11.0));
    }

    #[test]
    fn test_is_closed() {
        assert!(PointList::from_2d(&[(1.0, 1.0), (1.0, 2.0), (1.0, 1.0)]).is_closed());
        assert!(!PointList::from_2d(&[(1.0, 1.0), (1.0, 2.0)]).is_closed());
        assert!(!PointList::from_2d(&[(1.0, 1.0)]).is_closed());
    }
}

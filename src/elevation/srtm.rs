//! SRTM elevation tiles read from a local cache directory.
//!
//! Supports SRTM1 (1 arc-second, 3601x3601) and SRTM3 (3 arc-second, 1201x1201)
//! .hgt tiles. Provides bilinear interpolation for sub-pixel accuracy.
//!
//! # File Format
//!
//! Each .hgt file covers 1 degree x 1 degree of lat/lon.
//! Filename encodes the SW corner: `N48E019.hgt` covers lat 48-49, lon 19-20.
//! Data is row-major, big-endian signed 16-bit integers.
//! Row 0 = northernmost row, column 0 = westernmost column.
//! Special value -32768 means void/no data.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};

use super::{ElevationError, ElevationProvider};

/// Void/no-data sentinel in SRTM tiles.
const SRTM_VOID: i16 = -32768;

/// Default tile cache location.
pub const DEFAULT_CACHE_DIR: &str = "/tmp/srtm";

/// SRTM coverage in latitude: [-56, 60).
const MIN_LAT: f64 = -56.0;
const MAX_LAT: f64 = 60.0;

/// A single SRTM tile covering 1 degree x 1 degree of lat/lon.
#[derive(Debug, Clone, PartialEq)]
pub struct SrtmTile {
    /// SW corner latitude (signed, negative for southern hemisphere)
    lat_sw: i16,
    /// SW corner longitude (signed, negative for western hemisphere)
    lon_sw: i16,
    /// Number of samples per side (1201 for SRTM3, 3601 for SRTM1)
    samples_per_side: usize,
    /// Row-major elevation data in meters. Row 0 is northernmost.
    data: Vec<i16>,
}

impl SrtmTile {
    pub fn new(lat_sw: i16, lon_sw: i16, samples_per_side: usize, data: Vec<i16>) -> Result<Self, String> {
        if samples_per_side < 2 {
            return Err(format!("{} samples per side, need at least 2", samples_per_side));
        }
        if data.len() != samples_per_side * samples_per_side {
            return Err(format!(
                "{} samples for a {}x{} tile",
                data.len(),
                samples_per_side,
                samples_per_side
            ));
        }
        Ok(Self {
            lat_sw,
            lon_sw,
            samples_per_side,
            data,
        })
    }

    /// Decode big-endian samples. The resolution follows from the byte count.
    pub fn from_bytes(lat_sw: i16, lon_sw: i16, bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() % 2 != 0 {
            return Err(format!("odd byte count {}", bytes.len()));
        }
        let n_samples = bytes.len() / 2;
        let side = (n_samples as f64).sqrt().round() as usize;
        if side * side != n_samples {
            return Err(format!("{} bytes is not a square tile", bytes.len()));
        }

        let data = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Self::new(lat_sw, lon_sw, side, data)
    }

    pub fn corner(&self) -> (i16, i16) {
        (self.lat_sw, self.lon_sw)
    }

    pub fn samples_per_side(&self) -> usize {
        self.samples_per_side
    }

    /// Get the raw elevation value at integer row/col without interpolation.
    /// Returns None if the value is void (-32768) or indices are out of range.
    fn get_raw(&self, row: usize, col: usize) -> Option<i16> {
        let n = self.samples_per_side;
        if row >= n || col >= n {
            return None;
        }
        let val = self.data[row * n + col];
        if val == SRTM_VOID {
            return None;
        }
        Some(val)
    }

    /// Get the bilinearly interpolated elevation at a given (lat, lon).
    /// Returns None if the point is outside this tile or any of the four
    /// surrounding samples is void.
    pub fn interpolate(&self, lat: f64, lon: f64) -> Option<f64> {
        let n_intervals = self.samples_per_side - 1;

        let frac_lat = lat - self.lat_sw as f64; // 0.0 at south, 1.0 at north
        let frac_lon = lon - self.lon_sw as f64; // 0.0 at west, 1.0 at east
        if !(0.0..=1.0).contains(&frac_lat) || !(0.0..=1.0).contains(&frac_lon) {
            return None;
        }

        // Row increases southward
        let row_f = ((1.0 - frac_lat) * n_intervals as f64).clamp(0.0, n_intervals as f64);
        let col_f = (frac_lon * n_intervals as f64).clamp(0.0, n_intervals as f64);

        // Step back one on the last row/col so there is a full 2x2 cell
        let row0 = (row_f.floor() as usize).min(n_intervals - 1);
        let col0 = (col_f.floor() as usize).min(n_intervals - 1);

        let v00 = self.get_raw(row0, col0)? as f64; // top-left
        let v01 = self.get_raw(row0, col0 + 1)? as f64; // top-right
        let v10 = self.get_raw(row0 + 1, col0)? as f64; // bottom-left
        let v11 = self.get_raw(row0 + 1, col0 + 1)? as f64; // bottom-right

        let dr = row_f - row0 as f64;
        let dc = col_f - col0 as f64;

        let top = v00 + (v01 - v00) * dc;
        let bot = v10 + (v11 - v10) * dc;
        Some(top + (bot - top) * dr)
    }
}

/// Tile name for the cell containing (lat, lon), without extension.
///
/// Two latitude digits and three longitude digits: `N48E019`, `S12W077`.
pub fn tile_file_name(lat: f64, lon: f64) -> String {
    let min_lat = (lat.floor() as i32).abs();
    let min_lon = (lon.floor() as i32).abs();
    format!(
        "{}{:02}{}{:03}",
        if lat >= 0.0 { 'N' } else { 'S' },
        min_lat,
        if lon >= 0.0 { 'E' } else { 'W' },
        min_lon
    )
}

/// Parse an SRTM .hgt filename into (lat_sw, lon_sw).
///
/// Expected format: `N50E004.hgt`, `S12W077.HGT`, etc.
/// Returns `None` if the filename does not match the expected pattern.
pub fn parse_hgt_filename(filename: &str) -> Option<(i16, i16)> {
    let stem = filename
        .strip_suffix(".hgt")
        .or_else(|| filename.strip_suffix(".HGT"))
        .unwrap_or(filename);

    if stem.len() != 7 || !stem.is_ascii() {
        return None;
    }

    let bytes = stem.as_bytes();

    let lat_sign = match bytes[0] {
        b'N' | b'n' => 1i16,
        b'S' | b's' => -1i16,
        _ => return None,
    };
    let lat_val: i16 = stem[1..3].parse().ok()?;

    let lon_sign = match bytes[3] {
        b'E' | b'e' => 1i16,
        b'W' | b'w' => -1i16,
        _ => return None,
    };
    let lon_val: i16 = stem[4..7].parse().ok()?;

    Some((lat_sign * lat_val, lon_sign * lon_val))
}

/// Load a single SRTM .hgt tile from a file path.
pub fn load_tile(path: &Path) -> Result<SrtmTile, ElevationError> {
    let invalid = |reason: String| ElevationError::InvalidTile {
        path: path.to_path_buf(),
        reason,
    };

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| invalid("invalid filename".to_string()))?;
    let (lat_sw, lon_sw) = parse_hgt_filename(filename)
        .ok_or_else(|| invalid(format!("cannot parse SRTM filename {}", filename)))?;

    let bytes = fs::read(path).map_err(|source| ElevationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SrtmTile::from_bytes(lat_sw, lon_sw, &bytes).map_err(invalid)
}

type TileCache = HashMap<(i16, i16), Option<Arc<SrtmTile>>>;

/// Elevation from `.hgt` tiles in a local directory, loaded on first use.
///
/// Missing tiles are remembered so the directory is probed once per cell.
#[derive(Debug)]
pub struct SrtmProvider {
    cache_dir: PathBuf,
    tiles: Mutex<TileCache>,
}

impl Default for SrtmProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

impl SrtmProvider {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            tiles: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn tile_path(&self, lat: f64, lon: f64) -> Option<PathBuf> {
        let name = tile_file_name(lat, lon);
        ["hgt", "HGT"]
            .iter()
            .map(|ext| self.cache_dir.join(format!("{}.{}", name, ext)))
            .find(|p| p.is_file())
    }

    /// The tile covering (lat, lon), `Ok(None)` when none is on disk.
    ///
    /// A tile that fails to load is reported once, then cached as missing.
    /// Files are read without holding the cache lock.
    pub fn tile(&self, lat: f64, lon: f64) -> Result<Option<Arc<SrtmTile>>, ElevationError> {
        let key = (lat.floor() as i16, lon.floor() as i16);
        if let Some(cached) = self.lock_tiles().get(&key) {
            return Ok(cached.clone());
        }

        let loaded = match self.tile_path(lat, lon) {
            Some(path) => load_tile(&path).map(|tile| {
                debug!(
                    "Loaded SRTM tile {}: {}x{} samples",
                    path.display(),
                    tile.samples_per_side,
                    tile.samples_per_side
                );
                Some(Arc::new(tile))
            }),
            None => {
                debug!("No SRTM tile {} in {}", tile_file_name(lat, lon), self.cache_dir.display());
                Ok(None)
            }
        };

        let mut tiles = self.lock_tiles();
        match loaded {
            // Another worker may have loaded the same cell meanwhile
            Ok(tile) => Ok(tiles.entry(key).or_insert(tile).clone()),
            Err(e) => {
                tiles.entry(key).or_insert(None);
                Err(e)
            }
        }
    }

    fn lock_tiles(&self) -> MutexGuard<'_, TileCache> {
        self.tiles.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of cells probed so far, with or without a tile.
    pub fn cached_cells(&self) -> usize {
        self.lock_tiles().len()
    }
}

impl ElevationProvider for SrtmProvider {
    fn elevation(&self, lat: f64, lon: f64) -> Option<f64> {
        if !(MIN_LAT..MAX_LAT).contains(&lat) || !lon.is_finite() {
            return None;
        }
        match self.tile(lat, lon) {
            Ok(tile) => tile?.interpolate(lat, lon),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper: create a small synthetic tile with known elevation values.
    // For a 3x3 tile (samples_per_side = 3), we have 2 intervals.
    // Row 0 = north (lat_sw + 1), Row 2 = south (lat_sw).
    // Col 0 = west (lon_sw), Col 2 = east (lon_sw + 1).
    fn make_3x3_data() -> Vec<i16> {
        // Layout (geographic):
        //
        //   NW=100  N=200  NE=300    (row 0, lat = lat_sw + 1)
        //   W=400   C=500  E=600     (row 1, lat = lat_sw + 0.5)
        //   SW=700  S=800  SE=900    (row 2, lat = lat_sw)
        //
        #[rustfmt::skip]
        let data = vec![
            100, 200, 300,
            400, 500, 600,
            700, 800, 900,
        ];
        data
    }

    fn to_bytes(data: &[i16]) -> Vec<u8> {
        data.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_tile_file_name() {
        assert_eq!(tile_file_name(48.96, 19.92), "N48E019");
        assert_eq!(tile_file_name(5.2, 100.5), "N05E100");
        assert_eq!(tile_file_name(-12.3, -76.9), "S13W077");
        assert_eq!(tile_file_name(0.5, -0.5), "N00W001");
    }

    #[test]
    fn test_parse_hgt_filename() {
        assert_eq!(parse_hgt_filename("N50E004.hgt"), Some((50, 4)));
        assert_eq!(parse_hgt_filename("S12W077.HGT"), Some((-12, -77)));
        assert_eq!(parse_hgt_filename("n50e004.hgt"), Some((50, 4)));
        assert_eq!(parse_hgt_filename("N50E004"), Some((50, 4)));
        assert_eq!(parse_hgt_filename("X50E004.hgt"), None);
        assert_eq!(parse_hgt_filename("N50X004.hgt"), None);
        assert_eq!(parse_hgt_filename("short.hgt"), None);
        assert_eq!(parse_hgt_filename(""), None);
        assert_eq!(parse_hgt_filename("NXXEYYY.hgt"), None);
    }

    #[test]
    fn test_bilinear_interpolation() {
        let tile = SrtmTile::new(50, 4, 3, make_3x3_data()).unwrap();

        let center = tile.interpolate(50.5, 4.5).unwrap();
        assert!((center - 500.0).abs() < 1e-6, "center {}", center);

        // row_f = 0.5, col_f = 0.5 between 100/200/400/500
        let interior = tile.interpolate(50.75, 4.25).unwrap();
        assert!((interior - 300.0).abs() < 1e-6, "interior {}", interior);

        let sw = tile.interpolate(50.0, 4.0).unwrap();
        assert!((sw - 700.0).abs() < 1e-6);
        let ne = tile.interpolate(51.0, 5.0).unwrap();
        assert!((ne - 300.0).abs() < 1e-6);

        assert_eq!(tile.interpolate(49.9, 4.5), None);
        assert_eq!(tile.interpolate(50.5, 5.1), None);
    }

    #[test]
    fn test_void_handling() {
        let mut data = make_3x3_data();
        data[4] = SRTM_VOID;
        let tile = SrtmTile::new(50, 4, 3, data).unwrap();
        assert_eq!(tile.interpolate(50.5, 4.5), None);
        assert_eq!(tile.interpolate(50.75, 4.25), None);
    }

    #[test]
    fn test_from_bytes() {
        let tile = SrtmTile::from_bytes(50, 4, &to_bytes(&make_3x3_data())).unwrap();
        assert_eq!(tile.samples_per_side(), 3);
        assert_eq!(tile.corner(), (50, 4));
        assert!(SrtmTile::from_bytes(50, 4, &[0u8; 17]).is_err());
        assert!(SrtmTile::from_bytes(50, 4, &[0u8; 20]).is_err());
        assert!(SrtmTile::new(50, 4, 3, vec![0; 8]).is_err());
    }

    #[test]
    fn test_provider_reads_and_caches_tiles() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("N50E004.hgt"), to_bytes(&make_3x3_data())).unwrap();
        fs::write(dir.path().join("S01W002.HGT"), to_bytes(&[10, 10, 10, 10])).unwrap();

        let provider = SrtmProvider::new(dir.path());
        let ele = provider.elevation(50.5, 4.5).unwrap();
        assert!((ele - 500.0).abs() < 1e-6);
        assert_eq!(provider.elevation(-0.5, -1.5), Some(10.0));

        // No tile on disk
        assert_eq!(provider.elevation(10.5, 10.5), None);
        assert_eq!(provider.cached_cells(), 3);

        // Served from the cache after the file is gone
        fs::remove_file(dir.path().join("N50E004.hgt")).unwrap();
        assert!(provider.elevation(50.25, 4.25).is_some());
    }

    #[test]
    fn test_provider_coverage_bounds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("N60E004.hgt"), to_bytes(&make_3x3_data())).unwrap();
        let provider = SrtmProvider::new(dir.path());
        assert_eq!(provider.elevation(60.5, 4.5), None);
        assert_eq!(provider.elevation(-56.5, 4.5), None);
        assert_eq!(provider.cached_cells(), 0);
    }

    #[test]
    fn test_provider_bad_tile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("N50E004.hgt"), [1u8, 2, 3]).unwrap();
        let provider = SrtmProvider::new(dir.path());
        assert!(matches!(
            provider.tile(50.5, 4.5),
            Err(ElevationError::InvalidTile { .. })
        ));
        assert_eq!(provider.cached_cells(), 1);

        // Reported once, then remembered as missing
        assert!(matches!(provider.tile(50.5, 4.5), Ok(None)));
        assert_eq!(provider.elevation(50.5, 4.5), None);
    }

    #[test]
    fn test_provider_does_not_reread_failed_tile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("N50E004.hgt");
        fs::write(&path, [1u8, 2, 3]).unwrap();
        let provider = SrtmProvider::new(dir.path());
        assert_eq!(provider.elevation(50.5, 4.5), None);

        fs::write(&path, to_bytes(&make_3x3_data())).unwrap();
        assert_eq!(provider.elevation(50.5, 4.5), None);
        assert_eq!(provider.cached_cells(), 1);
    }

    #[test]
    fn test_default_cache_dir() {
        assert_eq!(SrtmProvider::default().cache_dir(), Path::new("/tmp/srtm"));
    }
}

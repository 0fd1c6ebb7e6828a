//! JSON-lines way records read by the CLI.

use std::collections::HashMap;
use std::io::BufRead;

use anyhow::{bail, Context, Result};
use butterfly_encode::{PointList, RouteNetwork, Way};
use serde::Deserialize;

/// One input line: `{"id":1,"tags":{...},"geometry":[[lat,lon,ele?],...],"network":"regional"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WayRecord {
    pub id: i64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub geometry: Vec<Vec<f64>>,
    #[serde(default)]
    pub network: RouteNetwork,
}

impl WayRecord {
    fn geometry(&self) -> Result<Option<PointList>> {
        if self.geometry.is_empty() {
            return Ok(None);
        }
        if self.geometry.iter().all(|p| p.len() == 2) {
            let points: Vec<(f64, f64)> = self.geometry.iter().map(|p| (p[0], p[1])).collect();
            return Ok(Some(PointList::from_2d(&points)));
        }
        if self.geometry.iter().all(|p| p.len() == 3) {
            let points: Vec<(f64, f64, f64)> = self.geometry.iter().map(|p| (p[0], p[1], p[2])).collect();
            return Ok(Some(PointList::from_3d(&points)));
        }
        bail!("way {}: points must all be [lat, lon] or all [lat, lon, ele]", self.id)
    }

    pub fn to_way(&self) -> Result<Way> {
        let mut way = Way::with_tags(self.id, self.tags.clone());
        if let Some(points) = self.geometry()? {
            way.set_geometry(points);
        }
        Ok(way)
    }
}

/// Parse every non-blank line of `reader`.
pub fn read_records(reader: impl BufRead) -> Result<Vec<WayRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: WayRecord = serde_json::from_str(&line)
            .with_context(|| format!("Invalid way record on line {}", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use butterfly_encode::EdgeGeometry;

    #[test]
    fn test_read_records() {
        let input = r#"{"id":1,"tags":{"highway":"footway"}}

{"id":2,"tags":{"route":"ferry"},"network":"regional","geometry":[[50.0,4.0],[50.1,4.0]]}
"#;
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].network, RouteNetwork::Other);
        assert_eq!(records[1].network, RouteNetwork::Regional);

        let way = records[1].to_way().unwrap();
        assert_eq!(way.tag("route"), Some("ferry"));
        assert_eq!(way.geometry().map(|g| g.len()), Some(2));
        assert!(!way.geometry().unwrap().is_3d());
    }

    #[test]
    fn test_mixed_geometry_is_rejected() {
        let input = r#"{"id":3,"geometry":[[50.0,4.0],[50.1,4.0,12.0]]}"#;
        let records = read_records(input.as_bytes()).unwrap();
        assert!(records[0].to_way().is_err());
    }

    #[test]
    fn test_bad_line_reports_position() {
        let input = "{\"id\":1}\nnot json\n";
        let err = read_records(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }
}

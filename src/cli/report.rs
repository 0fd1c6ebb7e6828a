//! Per-way encoding results and the run summary.

use anyhow::{Context, Result};
use butterfly_encode::{
    Access, EdgeGeometry, ElevationProvider, EncodedValues, FootEncoder, PriorityCode,
};
use serde::Serialize;

use super::input::WayRecord;

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedWay {
    pub id: i64,
    pub access: Access,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityCode>,
    /// Speed was rewritten from slope
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub corrected: bool,
    pub flags: Vec<u32>,
}

/// Encode one record into a fresh edge record.
///
/// 2D geometry is lifted to 3D through `elevation` when given, so the
/// hike profile can correct for slope.
pub fn encode_record(
    encoder: &FootEncoder,
    registry: &EncodedValues,
    elevation: Option<&dyn ElevationProvider>,
    record: &WayRecord,
) -> Result<EncodedWay> {
    let way = record.to_way()?;
    let mut flags = registry.create_edge_flags();
    encoder.set_route_network(&mut flags, record.network)?;

    let access = encoder
        .encode(&way, &mut flags)
        .with_context(|| format!("Failed to encode way {}", record.id))?;

    let mut corrected = false;
    if !access.can_skip() {
        if let Some(points) = way.geometry() {
            corrected = match elevation {
                Some(provider) if !points.is_3d() => {
                    encoder.apply_way_tags(&way, &points.with_elevation(provider), &mut flags)?
                }
                _ => encoder.apply_way_tags(&way, points, &mut flags)?,
            };
        }
    }

    let encoded = !access.can_skip();
    Ok(EncodedWay {
        id: record.id,
        access,
        speed: encoded.then(|| encoder.speed(&flags, false)),
        priority: if encoded { encoder.priority_code(&flags) } else { None },
        corrected,
        flags: flags.words().to_vec(),
    })
}

/// Counts per access class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub ways: usize,
    pub skipped: usize,
    pub ferries: usize,
    pub corrected: usize,
}

impl Summary {
    pub fn from_results(results: &[EncodedWay]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            s.ways += 1;
            match r.access {
                Access::Skip => s.skipped += 1,
                Access::Ferry => s.ferries += 1,
                Access::Way => {}
            }
            if r.corrected {
                s.corrected += 1;
            }
            s
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use butterfly_encode::{FootProfile, ProfileOptions, RouteNetwork};
    use std::collections::HashMap;

    struct Ramp;

    impl ElevationProvider for Ramp {
        fn elevation(&self, lat: f64, _lon: f64) -> Option<f64> {
            // 1 m per 0.0001 degree north, roughly 0.09 slope
            Some((lat - 47.0) * 10_000.0)
        }
    }

    fn record(id: i64, tags: &[(&str, &str)], geometry: Vec<Vec<f64>>) -> WayRecord {
        WayRecord {
            id,
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>(),
            geometry,
            network: RouteNetwork::Other,
        }
    }

    fn hike() -> (FootEncoder, EncodedValues) {
        let mut registry = EncodedValues::new();
        let profile = FootProfile::hike(&ProfileOptions::default()).unwrap();
        (FootEncoder::new(profile, &mut registry).unwrap(), registry)
    }

    #[test]
    fn test_encode_skip() {
        let (encoder, registry) = hike();
        let result = encode_record(&encoder, &registry, None, &record(1, &[("highway", "motorway")], vec![])).unwrap();
        assert_eq!(result.access, Access::Skip);
        assert_eq!(result.speed, None);
        assert_eq!(result.priority, None);
        assert!(result.flags.iter().all(|w| *w == 0));
    }

    #[test]
    fn test_encode_lifts_geometry() {
        let (encoder, registry) = hike();
        let rec = record(2, &[("highway", "path")], vec![vec![47.0, 11.0], vec![47.001, 11.0]]);

        let flat = encode_record(&encoder, &registry, None, &rec).unwrap();
        assert!(!flat.corrected);
        assert_eq!(flat.speed, Some(5.0));
        assert_eq!(flat.priority, Some(PriorityCode::Prefer));

        let lifted = encode_record(&encoder, &registry, Some(&Ramp), &rec).unwrap();
        assert!(lifted.corrected);
        // 10 m over 111 m
        assert_eq!(lifted.speed, Some(4.0));
    }

    #[test]
    fn test_summary() {
        let (encoder, registry) = hike();
        let records = [
            record(1, &[("highway", "footway")], vec![]),
            record(2, &[("route", "ferry")], vec![]),
            record(3, &[("highway", "motorway")], vec![]),
        ];
        let results: Vec<_> = records
            .iter()
            .map(|r| encode_record(&encoder, &registry, None, r).unwrap())
            .collect();
        assert_eq!(
            Summary::from_results(&results),
            Summary {
                ways: 3,
                skipped: 1,
                ferries: 1,
                corrected: 0,
            }
        );
    }
}

//! Ferry speed estimation from `duration` and trip length.

use log::warn;

use crate::way::{EdgeGeometry, Way};

/// Factor applied to trip speed for boarding and waiting time.
const WAITING_TIME_FACTOR: f64 = 1.4;
/// Below this the duration tag is most likely wrong (months instead of minutes).
const MIN_PLAUSIBLE_SPEED: f64 = 0.01;
/// Trips this short without a duration get the minimum speed.
const SHORT_TRIP_METERS: f64 = 300.0;

/// Parse an OSM `duration` value into seconds.
///
/// Accepts `MM`, `HH:MM`, `HH:MM:SS` and ISO 8601 durations of the form
/// `PnDTnHnMnS` (any subset of the components, weeks allowed).
pub fn parse_duration(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with('P') || value.starts_with('p') {
        return parse_iso_duration(&value[1..]);
    }

    let parts: Vec<u64> = value
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<_>>()?;
    let (hours, minutes, seconds) = match parts.as_slice() {
        [minutes] => (0, *minutes, 0),
        [hours, minutes] => (*hours, *minutes, 0),
        [hours, minutes, seconds] => (*hours, *minutes, *seconds),
        _ => return None,
    };
    // Overflowing values are malformed, not huge
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

fn parse_iso_duration(body: &str) -> Option<u64> {
    let mut seconds = 0.0;
    let mut in_time = false;
    let mut number = String::new();
    let mut any = false;

    for c in body.chars() {
        match c.to_ascii_uppercase() {
            'T' if !in_time && number.is_empty() => in_time = true,
            c if c.is_ascii_digit() || c == '.' => number.push(c),
            unit => {
                let n: f64 = number.parse().ok()?;
                number.clear();
                seconds += n * match (unit, in_time) {
                    ('W', false) => 7.0 * 86_400.0,
                    ('D', false) => 86_400.0,
                    ('H', true) => 3600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return None,
                };
                any = true;
            }
        }
    }

    if !number.is_empty() || !any {
        return None;
    }
    Some(seconds.round() as u64)
}

/// Estimates ferry speed in km/h from timetable tags.
#[derive(Debug, Clone, PartialEq)]
pub struct FerrySpeedCalculator {
    min_speed: f64,
    max_speed: f64,
    long_speed: f64,
    short_speed: f64,
    unknown_speed: f64,
}

impl FerrySpeedCalculator {
    pub fn new(
        speed_factor: f64,
        max_speed: f64,
        long_speed: f64,
        short_speed: f64,
        unknown_speed: f64,
    ) -> Self {
        Self {
            min_speed: speed_factor / 2.0,
            max_speed,
            long_speed,
            short_speed,
            unknown_speed,
        }
    }

    /// Defaults for walking profiles: 30 km/h long trips, 20 km/h short
    /// trips, 5 km/h when nothing is known.
    pub fn for_profile(speed_factor: f64, max_speed: f64) -> Self {
        Self::new(speed_factor, max_speed, 30.0, 20.0, 5.0)
    }

    fn duration_seconds(way: &Way) -> u64 {
        way.tag("duration:seconds")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .or_else(|| way.tag("duration").and_then(parse_duration))
            .unwrap_or(0)
    }

    fn distance_meters(way: &Way) -> Option<f64> {
        way.tag("estimated_distance")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .or_else(|| way.geometry().map(|g| g.planar_distance()))
    }

    pub fn speed(&self, way: &Way) -> f64 {
        let duration = Self::duration_seconds(way);
        let mut hours = duration as f64 / 3600.0;
        let distance = Self::distance_meters(way);

        if hours > 0.0 {
            if let Some(meters) = distance {
                let trip_speed = meters / 1000.0 / hours / WAITING_TIME_FACTOR;
                if trip_speed > MIN_PLAUSIBLE_SPEED {
                    if trip_speed > self.max_speed {
                        return self.max_speed;
                    }
                    if trip_speed.round() < self.min_speed {
                        return self.min_speed;
                    }
                    return trip_speed.round();
                }
                if !way.is_closed() {
                    warn!(
                        "Unrealistic long duration ignored in way {}: duration={} ({} minutes)",
                        way.id(),
                        way.tag("duration").unwrap_or("-"),
                        (duration as f64 / 60.0).round()
                    );
                }
                hours = 0.0;
            }
        }

        if hours == 0.0 {
            match distance {
                Some(meters) if meters <= SHORT_TRIP_METERS => self.min_speed,
                _ => self.unknown_speed,
            }
        } else if hours > 1.0 {
            self.long_speed
        } else {
            self.short_speed
        }
    }
}

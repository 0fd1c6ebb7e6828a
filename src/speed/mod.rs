//! Speed assignment and speed-limit parsing.

mod ferry;

pub use ferry::{parse_duration, FerrySpeedCalculator};

use crate::encoded::{DecimalEncodedValue, EdgeFlags, EncodingError};
use crate::profiles::FootProfile;
use crate::way::Way;

/// `maxspeed=none`: no limit, treated as a very fast road.
pub const SPEED_NONE_KMH: f64 = 150.0;
/// `maxspeed=walk`.
pub const SPEED_WALK_KMH: f64 = 6.0;

const MPH_TO_KMH: f64 = 1.609344;
const KNOTS_TO_KMH: f64 = 1.852;

/// Parse an OSM speed value into km/h.
///
/// Accepts plain numbers and numbers followed by `km/h`, `kmh`, `kph`, `mph`
/// or `knots`. For `;` lists only the first entry counts. Anything else,
/// including zero or negative speeds, is `None`.
pub fn parse_speed(value: &str) -> Option<f64> {
    let value = value.split(';').next()?.trim();
    match value {
        "none" => return Some(SPEED_NONE_KMH),
        "walk" => return Some(SPEED_WALK_KMH),
        _ => {}
    }

    let (number, factor) = if let Some(n) = value.strip_suffix("mph") {
        (n, MPH_TO_KMH)
    } else if let Some(n) = value.strip_suffix("knots") {
        (n, KNOTS_TO_KMH)
    } else if let Some(n) = value
        .strip_suffix("km/h")
        .or_else(|| value.strip_suffix("kmh"))
        .or_else(|| value.strip_suffix("kph"))
    {
        (n, 1.0)
    } else {
        (value, 1.0)
    };

    let speed: f64 = number.trim().parse().ok()?;
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }
    Some(speed * factor)
}

/// Smallest valid limit among `maxspeed`, `maxspeed:forward` and
/// `maxspeed:backward`.
pub fn max_speed_limit(way: &Way) -> Option<f64> {
    ["maxspeed", "maxspeed:forward", "maxspeed:backward"]
        .iter()
        .filter_map(|key| way.tag(key).and_then(parse_speed))
        .reduce(f64::min)
}

/// Speed for a non-ferry way before clamping.
pub fn way_speed(way: &Way, profile: &FootProfile) -> f64 {
    match way.tag("sac_scale") {
        Some("hiking") => profile.mean_speed,
        Some(_) => profile.slow_speed,
        None if way.has_tag("highway", "steps") => profile.mean_speed - 2.0,
        None => profile.mean_speed,
    }
}

/// Clamp `speed` to `max_speed` and write it forward, and backward when the
/// field has a backward slot.
pub fn set_speed(
    enc: &DecimalEncodedValue,
    flags: &mut EdgeFlags,
    speed: f64,
    max_speed: f64,
) -> Result<(), EncodingError> {
    let speed = speed.min(max_speed);
    enc.set_decimal(false, flags, speed)?;
    if enc.stores_two_directions() {
        enc.set_decimal(true, flags, speed)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoded::EncodedValues;
    use crate::profiles::{FootProfile, ProfileOptions};

    #[test]
    fn test_parse_speed_units() {
        assert_eq!(parse_speed("50"), Some(50.0));
        assert_eq!(parse_speed("50 km/h"), Some(50.0));
        assert_eq!(parse_speed("50kmh"), Some(50.0));
        assert_eq!(parse_speed("50 kph"), Some(50.0));
        assert!((parse_speed("30 mph").unwrap() - 48.28).abs() < 0.01);
        assert!((parse_speed("10 knots").unwrap() - 18.52).abs() < 1e-9);
        assert_eq!(parse_speed("none"), Some(SPEED_NONE_KMH));
        assert_eq!(parse_speed("walk"), Some(SPEED_WALK_KMH));
        assert_eq!(parse_speed("30;50"), Some(30.0));
    }

    #[test]
    fn test_parse_speed_invalid() {
        assert_eq!(parse_speed(""), None);
        assert_eq!(parse_speed("signals"), None);
        assert_eq!(parse_speed("RO:urban"), None);
        assert_eq!(parse_speed("0"), None);
        assert_eq!(parse_speed("-20"), None);
        assert_eq!(parse_speed("NaN"), None);
    }

    #[test]
    fn test_max_speed_limit_takes_smallest() {
        let way = Way::with_tags(
            1,
            [("maxspeed", "70"), ("maxspeed:forward", "50"), ("maxspeed:backward", "bogus")],
        );
        assert_eq!(max_speed_limit(&way), Some(50.0));
        assert_eq!(max_speed_limit(&Way::with_tags(1, [("maxspeed", "bogus")])), None);
        assert_eq!(max_speed_limit(&Way::new(1)), None);
    }

    #[test]
    fn test_way_speed() {
        let profile = FootProfile::foot(&ProfileOptions::default()).unwrap();
        let speed = |tags: &[(&str, &str)]| way_speed(&Way::with_tags(1, tags.iter().copied()), &profile);

        assert_eq!(speed(&[("highway", "footway")]), 5.0);
        assert_eq!(speed(&[("highway", "steps")]), 3.0);
        assert_eq!(speed(&[("highway", "path"), ("sac_scale", "hiking")]), 5.0);
        assert_eq!(speed(&[("highway", "path"), ("sac_scale", "mountain_hiking")]), 2.0);
        // sac_scale takes precedence over steps
        assert_eq!(speed(&[("highway", "steps"), ("sac_scale", "hiking")]), 5.0);
    }

    #[test]
    fn test_set_speed_clamps_once_and_mirrors() {
        let mut registry = EncodedValues::new();
        let one_way = registry.add_decimal("a_speed", 4, 1.0, false).unwrap();
        let two_way = registry.add_decimal("b_speed", 4, 1.0, true).unwrap();
        let mut flags = registry.create_edge_flags();

        set_speed(&one_way, &mut flags, 40.0, 15.0).unwrap();
        assert_eq!(one_way.get_decimal(false, &flags), 15.0);

        set_speed(&two_way, &mut flags, 4.0, 15.0).unwrap();
        assert_eq!(two_way.get_decimal(false, &flags), 4.0);
        assert_eq!(two_way.get_decimal(true, &flags), 4.0);
    }
}

//! Pedestrian profile - tag vocabulary and priority rules for walking

use std::collections::HashMap;

use super::{FootProfile, ProfileError, ProfileKind, ProfileOptions};
use crate::encoded::RouteNetwork;
use crate::priority::{PriorityCode, PriorityTable};
use crate::speed::max_speed_limit;
use crate::way::{tag_set, Way};

const SLOW_SPEED: f64 = 2.0;
const MEAN_SPEED: f64 = 5.0;
// Ferries are faster than pedestrians
const FERRY_SPEED: f64 = 15.0;

const SAFE_HIGHWAYS: &[&str] = &[
    "footway",
    "path",
    "steps",
    "pedestrian",
    "living_street",
    "track",
    "residential",
    "service",
    "platform",
];

const AVOID_HIGHWAYS: &[&str] = &[
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
];

// bridleway is disallowed in some countries
const OTHER_ALLOWED_HIGHWAYS: &[&str] = &["cycleway", "unclassified", "road"];

/// Foot profile vocabulary, before policy switches are applied.
pub(super) fn base(name: &str, options: &ProfileOptions) -> Result<FootProfile, ProfileError> {
    if !(1..=31).contains(&options.speed_bits) {
        return Err(ProfileError::InvalidSpeedBits(options.speed_bits));
    }
    if !(options.speed_factor.is_finite() && options.speed_factor > 0.0) {
        return Err(ProfileError::InvalidSpeedFactor(options.speed_factor));
    }

    let safe_highways = tag_set(SAFE_HIGHWAYS);
    let avoid_highways = tag_set(AVOID_HIGHWAYS);
    let allowed_highways = safe_highways
        .iter()
        .chain(&avoid_highways)
        .cloned()
        .chain(OTHER_ALLOWED_HIGHWAYS.iter().map(|h| h.to_string()))
        .collect();

    let route_bonus: HashMap<RouteNetwork, PriorityCode> = [
        RouteNetwork::International,
        RouteNetwork::National,
        RouteNetwork::Regional,
        RouteNetwork::Local,
    ]
    .into_iter()
    .map(|network| (network, PriorityCode::Unchanged))
    .collect();

    Ok(FootProfile {
        name: name.to_string(),
        kind: ProfileKind::Foot,
        safe_highways,
        avoid_highways,
        allowed_highways,
        intended_values: tag_set(&["yes", "designated", "official", "permissive"]),
        restricted_values: tag_set(&["no", "restricted", "military", "emergency", "private"]),
        restrictions: vec!["foot".to_string(), "access".to_string()],
        ferry_values: tag_set(&["ferry", "shuttle_train"]),
        // Higher grades need climbing skills
        allowed_sac_scale: tag_set(&["hiking", "mountain_hiking", "demanding_mountain_hiking"]),
        sidewalk_values: tag_set(&["yes", "both", "left", "right"]),
        // "separate" sidewalks are mapped as their own ways
        sidewalks_no_values: tag_set(&["no", "none", "separate"]),
        slow_speed: SLOW_SPEED,
        mean_speed: MEAN_SPEED,
        ferry_speed: FERRY_SPEED,
        speed_bits: options.speed_bits,
        speed_factor: options.speed_factor,
        speed_two_directions: options.speed_two_directions,
        max_speed: FERRY_SPEED,
        route_bonus,
        block_private: true,
        block_fords: false,
        collect: collect_foot,
        elevation_correction: false,
    })
}

/// How the road type and speed limit classify a way for walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RoadClass {
    /// Quiet: a safe highway type or a limit of at most 20 km/h
    Safe,
    /// Busy: a limit above 50 km/h or an avoided highway type
    Busy,
    Other,
}

pub(super) fn road_class(way: &Way, profile: &FootProfile) -> RoadClass {
    let limit = max_speed_limit(way);
    if way.has_tag_in("highway", &profile.safe_highways) || limit.is_some_and(|l| l <= 20.0) {
        RoadClass::Safe
    } else if limit.is_some_and(|l| l > 50.0) || way.has_tag_in("highway", &profile.avoid_highways) {
        RoadClass::Busy
    } else {
        RoadClass::Other
    }
}

/// Rules shared by both walking profiles that do not depend on road class.
pub(super) fn collect_designations(way: &Way, table: &mut PriorityTable) {
    if way.has_tag("foot", "designated") {
        table.insert(100.0, PriorityCode::Prefer);
    }
}

pub(super) fn collect_bicycle(way: &Way, table: &mut PriorityTable) {
    if way.has_tag("bicycle", "official") || way.has_tag("bicycle", "designated") {
        table.insert(44.0, PriorityCode::SlightAvoid);
    }
}

/// Priority rules of the foot profile.
pub fn collect_foot(way: &Way, profile: &FootProfile, table: &mut PriorityTable) {
    collect_designations(way, table);

    match road_class(way, profile) {
        RoadClass::Safe => {
            table.insert(40.0, PriorityCode::Prefer);
            if way.has_tag_in("tunnel", &profile.intended_values) {
                if way.has_tag_in("sidewalk", &profile.sidewalks_no_values) {
                    table.insert(40.0, PriorityCode::SlightAvoid);
                } else {
                    table.insert(40.0, PriorityCode::Unchanged);
                }
            }
        }
        RoadClass::Busy => {
            if !way.has_tag_in("sidewalk", &profile.sidewalk_values) {
                table.insert(45.0, PriorityCode::Avoid);
            }
        }
        RoadClass::Other => {}
    }

    collect_bicycle(way, table);
}

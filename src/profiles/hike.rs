//! Hiking profile: the foot profile opened up for mountain trails.

use super::foot::{collect_bicycle, collect_designations, road_class, RoadClass};
use super::{FootProfile, ProfileKind};
use crate::encoded::RouteNetwork;
use crate::priority::{PriorityCode, PriorityTable};
use crate::way::Way;

/// Turn a foot profile into its hiking variant.
///
/// Access restrictions are inherited untouched, so hiking never opens a way
/// that foot rejects through `foot`/`access` tags.
pub(super) fn derive(mut profile: FootProfile) -> FootProfile {
    profile.kind = ProfileKind::Hike;

    // Hiking accepts every sac_scale grade
    profile.allowed_sac_scale.extend(
        ["alpine_hiking", "demanding_alpine_hiking", "difficult_alpine_hiking"]
            .iter()
            .map(|s| s.to_string()),
    );

    profile.route_bonus = [
        (RouteNetwork::International, PriorityCode::Best),
        (RouteNetwork::National, PriorityCode::Best),
        (RouteNetwork::Regional, PriorityCode::VeryNice),
        (RouteNetwork::Local, PriorityCode::VeryNice),
    ]
    .into_iter()
    .collect();

    profile.collect = collect_hike;
    profile.elevation_correction = true;
    profile
}

/// Priority rules of the hike profile.
///
/// Differs from [`super::collect_foot`] in how tunnels without sidewalk and
/// busy roads are punished.
pub fn collect_hike(way: &Way, profile: &FootProfile, table: &mut PriorityTable) {
    collect_designations(way, table);

    match road_class(way, profile) {
        RoadClass::Safe => {
            table.insert(40.0, PriorityCode::Prefer);
            if way.has_tag_in("tunnel", &profile.intended_values) {
                if way.has_tag_in("sidewalk", &profile.sidewalks_no_values) {
                    table.insert(40.0, PriorityCode::Avoid);
                } else {
                    table.insert(40.0, PriorityCode::Unchanged);
                }
            }
        }
        RoadClass::Busy => {
            if way.has_tag_in("sidewalk", &profile.sidewalks_no_values) {
                table.insert(45.0, PriorityCode::Bad);
            } else {
                table.insert(45.0, PriorityCode::Avoid);
            }
        }
        RoadClass::Other => {}
    }

    collect_bicycle(way, table);
}

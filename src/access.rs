//! Access classification: can a pedestrian use this way at all?

use serde::Serialize;

use crate::conditional::ConditionalTagInspector;
use crate::profiles::FootProfile;
use crate::way::Way;

/// Outcome of classifying one way for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Not traversable; nothing is written for this way.
    Skip,
    Way,
    Ferry,
}

impl Access {
    pub fn can_skip(self) -> bool {
        self == Access::Skip
    }

    pub fn is_ferry(self) -> bool {
        self == Access::Ferry
    }
}

fn hard_restricted(way: &Way, profile: &FootProfile, conditional: &dyn ConditionalTagInspector) -> bool {
    way.has_any_tag_in(&profile.restrictions, &profile.restricted_values)
        && !conditional.is_restricted_way_conditionally_permitted(way)
}

/// Classify `way`; the first matching rule decides.
pub fn classify(way: &Way, profile: &FootProfile, conditional: &dyn ConditionalTagInspector) -> Access {
    let Some(highway) = way.tag("highway") else {
        let mut candidate = Access::Skip;
        if way.has_tag_in("route", &profile.ferry_values) {
            let foot = way.tag("foot");
            if foot.map_or(true, |f| profile.intended_values.contains(f)) {
                candidate = Access::Ferry;
            }
        }
        if way.has_tag("railway", "platform") || way.has_tag("man_made", "pier") {
            candidate = Access::Way;
        }
        if candidate.can_skip() || hard_restricted(way, profile, conditional) {
            return Access::Skip;
        }
        return candidate;
    };

    // Higher grades need climbing gear
    if way.has_tag_key("sac_scale") && !way.has_tag_in("sac_scale", &profile.allowed_sac_scale) {
        return Access::Skip;
    }

    if way.has_tag_in("foot", &profile.intended_values) {
        return Access::Way;
    }

    if hard_restricted(way, profile, conditional) {
        return Access::Skip;
    }

    if way.has_tag_in("sidewalk", &profile.sidewalk_values) {
        return Access::Way;
    }

    if !profile.allowed_highways.contains(highway) {
        return Access::Skip;
    }

    if way.has_tag("motorroad", "yes") {
        return Access::Skip;
    }

    if profile.block_fords && (highway == "ford" || way.has_tag_key("ford")) {
        return Access::Skip;
    }

    if conditional.is_permitted_way_conditionally_restricted(way) {
        return Access::Skip;
    }

    Access::Way
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditional::NoConditionals;
    use crate::profiles::ProfileOptions;

    struct Always(bool, bool);

    impl ConditionalTagInspector for Always {
        fn is_restricted_way_conditionally_permitted(&self, _way: &Way) -> bool {
            self.0
        }

        fn is_permitted_way_conditionally_restricted(&self, _way: &Way) -> bool {
            self.1
        }
    }

    fn foot() -> FootProfile {
        FootProfile::foot(&ProfileOptions::default()).unwrap()
    }

    fn access(profile: &FootProfile, tags: &[(&str, &str)]) -> Access {
        classify(&Way::with_tags(1, tags.iter().copied()), profile, &NoConditionals)
    }

    #[test]
    fn test_without_highway() {
        let p = foot();
        assert_eq!(access(&p, &[]), Access::Skip);
        assert_eq!(access(&p, &[("name", "Somewhere")]), Access::Skip);
        assert_eq!(access(&p, &[("route", "ferry")]), Access::Ferry);
        assert_eq!(access(&p, &[("route", "shuttle_train")]), Access::Ferry);
        assert_eq!(access(&p, &[("route", "ferry"), ("foot", "yes")]), Access::Ferry);
        assert_eq!(access(&p, &[("route", "ferry"), ("foot", "no")]), Access::Skip);
        assert_eq!(access(&p, &[("railway", "platform")]), Access::Way);
        assert_eq!(access(&p, &[("man_made", "pier")]), Access::Way);
        // Platform wins over the ferry candidate
        assert_eq!(access(&p, &[("route", "ferry"), ("railway", "platform")]), Access::Way);
        assert_eq!(access(&p, &[("man_made", "pier"), ("access", "private")]), Access::Skip);
        assert_eq!(access(&p, &[("route", "ferry"), ("access", "no")]), Access::Skip);
    }

    #[test]
    fn test_sac_scale() {
        let p = foot();
        assert_eq!(access(&p, &[("highway", "path"), ("sac_scale", "hiking")]), Access::Way);
        assert_eq!(
            access(&p, &[("highway", "path"), ("sac_scale", "demanding_mountain_hiking")]),
            Access::Way
        );
        assert_eq!(access(&p, &[("highway", "path"), ("sac_scale", "alpine_hiking")]), Access::Skip);
        // Checked before the foot tag
        assert_eq!(
            access(&p, &[("highway", "path"), ("sac_scale", "alpine_hiking"), ("foot", "yes")]),
            Access::Skip
        );
    }

    #[test]
    fn test_intended_foot_overrides_road_type() {
        let p = foot();
        for highway in ["motorway", "primary", "footway", "bridleway"] {
            assert_eq!(access(&p, &[("highway", highway), ("foot", "yes")]), Access::Way);
            assert_eq!(access(&p, &[("highway", highway), ("foot", "designated"), ("access", "no")]), Access::Way);
        }
    }

    #[test]
    fn test_restrictions() {
        let p = foot();
        assert_eq!(access(&p, &[("highway", "footway"), ("access", "no")]), Access::Skip);
        assert_eq!(access(&p, &[("highway", "footway"), ("foot", "private")]), Access::Skip);
        assert_eq!(access(&p, &[("highway", "service"), ("access", "military")]), Access::Skip);
        assert_eq!(access(&p, &[("highway", "primary"), ("sidewalk", "both")]), Access::Way);
        assert_eq!(access(&p, &[("highway", "motorway"), ("sidewalk", "left")]), Access::Way);
        assert_eq!(access(&p, &[("highway", "motorway")]), Access::Skip);
        assert_eq!(access(&p, &[("highway", "bridleway")]), Access::Skip);
        assert_eq!(access(&p, &[("highway", "unclassified"), ("motorroad", "yes")]), Access::Skip);
    }

    #[test]
    fn test_conditional_oracle() {
        let p = foot();
        let way = Way::with_tags(1, [("highway", "footway"), ("access", "no")]);
        assert_eq!(classify(&way, &p, &Always(true, false)), Access::Way);

        let way = Way::with_tags(1, [("highway", "footway")]);
        assert_eq!(classify(&way, &p, &Always(false, true)), Access::Skip);

        let way = Way::with_tags(1, [("route", "ferry"), ("access", "private")]);
        assert_eq!(classify(&way, &p, &Always(true, false)), Access::Ferry);
    }

    #[test]
    fn test_block_fords() {
        let open = foot();
        let blocked = FootProfile::foot(&ProfileOptions {
            block_fords: true,
            ..Default::default()
        })
        .unwrap();

        let tags = [("highway", "track"), ("ford", "yes")];
        assert_eq!(access(&open, &tags), Access::Way);
        assert_eq!(access(&blocked, &tags), Access::Skip);
        // An explicit foot tag still wins
        assert_eq!(access(&blocked, &[("highway", "track"), ("ford", "yes"), ("foot", "yes")]), Access::Way);
    }

    #[test]
    fn test_block_private() {
        let open = FootProfile::foot(&ProfileOptions {
            block_private: false,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(access(&foot(), &[("highway", "footway"), ("access", "private")]), Access::Skip);
        assert_eq!(access(&open, &[("highway", "footway"), ("access", "private")]), Access::Way);
        assert_eq!(access(&open, &[("highway", "motorway"), ("foot", "private")]), Access::Way);
        assert_eq!(access(&open, &[("highway", "footway"), ("access", "no")]), Access::Skip);
    }
}

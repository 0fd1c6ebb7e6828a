//! # Butterfly-encode
//!
//! Derives the per-edge routing flags of walking profiles from OpenStreetMap
//! way tags: access in both directions, average speed and a priority code
//! that preference-aware weightings turn into a cost multiplier.
//!
//! ```
//! use butterfly_encode::{Access, EncodedValues, FootEncoder, FootProfile, ProfileOptions, Way};
//!
//! let mut registry = EncodedValues::new();
//! let profile = FootProfile::foot(&ProfileOptions::default()).unwrap();
//! let encoder = FootEncoder::new(profile, &mut registry).unwrap();
//!
//! let way = Way::with_tags(1, [("highway", "footway")]);
//! let mut flags = registry.create_edge_flags();
//! assert_eq!(encoder.encode(&way, &mut flags).unwrap(), Access::Way);
//! assert_eq!(encoder.speed(&flags, false), 5.0);
//! ```
//!
//! The hike profile additionally corrects speed for slope once edge
//! geometry with elevation is known, see [`FootEncoder::apply_way_tags`].

pub mod access;
pub mod conditional;
pub mod elevation;
pub mod encoded;
pub mod encoder;
pub mod priority;
pub mod profiles;
pub mod speed;
pub mod way;

pub use access::Access;
pub use conditional::{ConditionalTagInspector, NoConditionals};
pub use elevation::{ElevationError, ElevationProvider, SrtmProvider};
pub use encoded::{EdgeFlags, EncodedValues, EncodingError, RouteNetwork};
pub use encoder::{Capability, FootEncoder};
pub use priority::{PriorityCode, PriorityTable};
pub use profiles::{FootProfile, ProfileConfig, ProfileError, ProfileKind, ProfileOptions};
pub use way::{EdgeGeometry, MeasuredEdge, PointList, Way};

// Re-export common error types
pub use butterfly_common::{Error, Result};

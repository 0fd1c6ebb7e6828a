//! Walking profiles: tag vocabularies, speeds and priority rules.
//!
//! A [`FootProfile`] is built once from [`ProfileOptions`] and read-only
//! afterwards. The hike profile is a foot profile with extra sac_scale
//! grades, a stronger route bonus, its own priority rules and elevation
//! correction switched on.

mod foot;
mod hike;
mod options;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::encoded::{EncodedValues, EncodingError, RouteNetwork};
use crate::priority::{CollectFn, PriorityCode};
use crate::way::TagSet;

pub use foot::collect_foot;
pub use hike::collect_hike;
pub use options::{ProfileConfig, ProfileOptions, OPTION_KEYS};

/// Profile construction failures.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("speed_bits must be within 1..=31, got {0}")]
    InvalidSpeedBits(u32),

    #[error("speed_factor must be a positive number, got {0}")]
    InvalidSpeedFactor(f64),

    #[error("profile '{profile}' has an empty {set} set")]
    EmptySet { profile: String, set: &'static str },

    #[error("cannot unblock private access: 'private' is not a restricted value")]
    MissingPrivate,

    #[error(transparent)]
    Options(#[from] butterfly_common::Error),

    #[error("invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Built-in profile families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Foot,
    Hike,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 2] = [ProfileKind::Foot, ProfileKind::Hike];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Foot => "foot",
            ProfileKind::Hike => "hike",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = butterfly_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| butterfly_common::Error::UnknownProfile {
                name: name.to_string(),
                suggestion: butterfly_common::suggest_correction(name, &Self::names()),
            })
    }
}

/// Classification, speed and priority configuration for one walking mode.
#[derive(Debug, Clone)]
pub struct FootProfile {
    pub name: String,
    pub kind: ProfileKind,

    pub safe_highways: TagSet,
    pub avoid_highways: TagSet,
    pub allowed_highways: TagSet,
    pub intended_values: TagSet,
    pub restricted_values: TagSet,
    /// Keys checked for restricted values, most specific first
    pub restrictions: Vec<String>,
    pub ferry_values: TagSet,
    pub allowed_sac_scale: TagSet,
    pub sidewalk_values: TagSet,
    pub sidewalks_no_values: TagSet,

    pub slow_speed: f64,
    pub mean_speed: f64,
    pub ferry_speed: f64,
    pub speed_bits: u32,
    pub speed_factor: f64,
    pub speed_two_directions: bool,
    /// Next storable speed at or above the ferry speed
    pub max_speed: f64,

    pub route_bonus: HashMap<RouteNetwork, PriorityCode>,
    pub block_private: bool,
    pub block_fords: bool,

    pub collect: CollectFn,
    pub elevation_correction: bool,
}

impl FootProfile {
    pub fn new(kind: ProfileKind, options: &ProfileOptions) -> Result<Self, ProfileError> {
        match kind {
            ProfileKind::Foot => Self::foot(options),
            ProfileKind::Hike => Self::hike(options),
        }
    }

    pub fn from_config(config: &ProfileConfig) -> Result<Self, ProfileError> {
        Self::new(config.profile, &config.options)
    }

    pub fn foot(options: &ProfileOptions) -> Result<Self, ProfileError> {
        let name = options.name.as_deref().unwrap_or("foot");
        let profile = foot::base(name, options)?.finish(options)?;
        info!(
            "Built profile '{}' (speed_bits={}, speed_factor={}, max_speed={})",
            profile.name, profile.speed_bits, profile.speed_factor, profile.max_speed
        );
        Ok(profile)
    }

    pub fn hike(options: &ProfileOptions) -> Result<Self, ProfileError> {
        let name = options.name.as_deref().unwrap_or("hike");
        let profile = hike::derive(foot::base(name, options)?).finish(options)?;
        info!(
            "Built profile '{}' (speed_bits={}, speed_factor={}, max_speed={}, elevation correction)",
            profile.name, profile.speed_bits, profile.speed_factor, profile.max_speed
        );
        Ok(profile)
    }

    /// Apply the policy switches, compute the speed ceiling and validate.
    fn finish(mut self, options: &ProfileOptions) -> Result<Self, ProfileError> {
        self.set_block_private(options.block_private)?;
        self.block_fords = options.block_fords;

        let probe = EncodedValues::new().add_decimal("probe", self.speed_bits, self.speed_factor, false)?;
        self.max_speed = probe.next_storable_value(self.ferry_speed);

        self.validate()?;
        Ok(self)
    }

    fn set_block_private(&mut self, block: bool) -> Result<(), ProfileError> {
        self.block_private = block;
        if !block {
            if !self.restricted_values.remove("private") {
                return Err(ProfileError::MissingPrivate);
            }
            self.intended_values.insert("private".to_string());
        }
        Ok(())
    }

    /// Check that every mandatory vocabulary is populated.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let mandatory = [
            ("allowed highway", &self.allowed_highways),
            ("intended access", &self.intended_values),
            ("restricted access", &self.restricted_values),
            ("ferry route", &self.ferry_values),
            ("sac_scale", &self.allowed_sac_scale),
        ];
        for (set, values) in mandatory {
            if values.is_empty() {
                return Err(ProfileError::EmptySet {
                    profile: self.name.clone(),
                    set,
                });
            }
        }
        if self.restrictions.is_empty() {
            return Err(ProfileError::EmptySet {
                profile: self.name.clone(),
                set: "restriction key",
            });
        }
        Ok(())
    }

    /// Priority bonus for ways in a route relation of `network`.
    pub fn route_bonus(&self, network: RouteNetwork) -> Option<PriorityCode> {
        self.route_bonus.get(&network).copied()
    }
}

//! Profile configuration.
//!
//! Accepts the pipe-separated encoder syntax (`hike|block_fords=true`) or a
//! JSON object (`{"profile":"hike","block_fords":true}`).

use std::str::FromStr;

use butterfly_common::{suggest_correction, Error};
use serde::{Deserialize, Serialize};

use super::{ProfileError, ProfileKind};

/// Keys understood in the pipe-separated syntax.
pub const OPTION_KEYS: &[&str] = &[
    "name",
    "speed_bits",
    "speed_factor",
    "speed_two_directions",
    "block_private",
    "block_fords",
];

/// Tunables shared by the walking profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOptions {
    /// Field prefix; defaults to the profile kind
    pub name: Option<String>,
    pub speed_bits: u32,
    pub speed_factor: f64,
    pub speed_two_directions: bool,
    pub block_private: bool,
    pub block_fords: bool,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            name: None,
            speed_bits: 4,
            speed_factor: 1.0,
            speed_two_directions: false,
            block_private: true,
            block_fords: false,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{key}={value}: expected {expected}")))
}

impl ProfileOptions {
    /// Set one option from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        match key.trim() {
            "name" => self.name = Some(value.trim().to_string()),
            "speed_bits" => self.speed_bits = parse_value(key, value, "an integer")?,
            "speed_factor" => self.speed_factor = parse_value(key, value, "a number")?,
            "speed_two_directions" => {
                self.speed_two_directions = parse_value(key, value, "true or false")?
            }
            "block_private" => self.block_private = parse_value(key, value, "true or false")?,
            "block_fords" => self.block_fords = parse_value(key, value, "true or false")?,
            other => {
                return Err(Error::UnknownOption {
                    key: other.to_string(),
                    suggestion: suggest_correction(other, OPTION_KEYS),
                })
            }
        }
        Ok(())
    }
}

/// Profile kind plus its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(alias = "kind")]
    pub profile: ProfileKind,
    #[serde(flatten)]
    pub options: ProfileOptions,
}

impl ProfileConfig {
    pub fn kind(&self) -> ProfileKind {
        self.profile
    }
}

impl FromStr for ProfileConfig {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('{') {
            return Ok(serde_json::from_str(s)?);
        }

        let mut parts = s.split('|');
        let profile: ProfileKind = parts.next().unwrap_or_default().parse()?;
        let mut options = ProfileOptions::default();
        for part in parts.filter(|p| !p.trim().is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                Error::InvalidInput(format!("'{part}': expected key=value"))
            })?;
            options.set(key, value)?;
        }
        Ok(Self { profile, options })
    }
}

//! Tagged OSM way as seen by the encoders.
//!
//! Tag lookups return `Option<&str>`; an absent key and a key the rules do
//! not understand are treated the same way by every caller.

mod geometry;

use std::collections::{HashMap, HashSet};

pub use geometry::{haversine_distance, EdgeGeometry, MeasuredEdge, PointList};

/// A set of accepted (or rejected) tag values.
pub type TagSet = HashSet<String>;

/// Build a [`TagSet`] from string literals.
pub fn tag_set(values: &[&str]) -> TagSet {
    values.iter().map(|v| v.to_string()).collect()
}

/// Immutable input record: id, tags and optional geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Way {
    id: i64,
    tags: HashMap<String, String>,
    geometry: Option<PointList>,
}

impl Way {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_tags<K, V, I>(id: i64, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id,
            tags: tags.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            geometry: None,
        }
    }

    /// Build a way from dictionary-encoded tag arrays.
    ///
    /// `keys[i]`/`vals[i]` are ids into `key_dict`/`val_dict`. Pairs whose id
    /// has no dictionary entry are dropped.
    pub fn from_dict_encoded(
        id: i64,
        keys: &[u32],
        vals: &[u32],
        key_dict: &HashMap<u32, String>,
        val_dict: &HashMap<u32, String>,
    ) -> Self {
        let tags = keys
            .iter()
            .zip(vals)
            .filter_map(|(k, v)| Some((key_dict.get(k)?.clone(), val_dict.get(v)?.clone())))
            .collect();
        Self {
            id,
            tags,
            geometry: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn has_tag_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// `key` is present with exactly `value`.
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tag(key) == Some(value)
    }

    /// `key` is present and its value is in `values`.
    pub fn has_tag_in(&self, key: &str, values: &TagSet) -> bool {
        self.tag(key).is_some_and(|v| values.contains(v))
    }

    /// Any of `keys` carries a value from `values`.
    pub fn has_any_tag_in(&self, keys: &[String], values: &TagSet) -> bool {
        keys.iter().any(|k| self.has_tag_in(k, values))
    }

    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn geometry(&self) -> Option<&PointList> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: PointList) {
        self.geometry = Some(geometry);
    }

    /// First and last node coincide.
    pub fn is_closed(&self) -> bool {
        self.geometry.as_ref().is_some_and(PointList::is_closed)
    }
}

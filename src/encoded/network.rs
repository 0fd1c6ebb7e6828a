//! Route-relation network level stored per edge.

use serde::{Deserialize, Serialize};

use super::{EdgeFlags, EncodingError, IntEncodedValue};

/// Highest network level of the route relations a way belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteNetwork {
    /// Not part of any known route relation
    #[default]
    Other,
    International,
    National,
    Regional,
    Local,
}

impl RouteNetwork {
    pub const ALL: [RouteNetwork; 5] = [
        RouteNetwork::Other,
        RouteNetwork::International,
        RouteNetwork::National,
        RouteNetwork::Regional,
        RouteNetwork::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteNetwork::Other => "other",
            RouteNetwork::International => "international",
            RouteNetwork::National => "national",
            RouteNetwork::Regional => "regional",
            RouteNetwork::Local => "local",
        }
    }

    fn ordinal(self) -> u32 {
        self as u32
    }

    fn from_ordinal(ordinal: u32) -> Self {
        Self::ALL
            .get(ordinal as usize)
            .copied()
            .unwrap_or(RouteNetwork::Other)
    }
}

/// Bits needed for [`RouteNetwork`] ordinals.
pub(crate) const NETWORK_BITS: u32 = 3;

/// Enum field holding a [`RouteNetwork`] ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNetworkEncodedValue {
    inner: IntEncodedValue,
}

impl RouteNetworkEncodedValue {
    pub(crate) fn new(inner: IntEncodedValue) -> Self {
        Self { inner }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn get_network(&self, flags: &EdgeFlags) -> RouteNetwork {
        RouteNetwork::from_ordinal(self.inner.get_int(false, flags))
    }

    pub fn set_network(&self, flags: &mut EdgeFlags, network: RouteNetwork) -> Result<(), EncodingError> {
        self.inner.set_int(false, flags, network.ordinal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let network: RouteNetwork = serde_json::from_str("\"regional\"").unwrap();
        assert_eq!(network, RouteNetwork::Regional);
        assert_eq!(serde_json::to_string(&RouteNetwork::International).unwrap(), "\"international\"");
        for network in RouteNetwork::ALL {
            assert_eq!(
                serde_json::to_string(&network).unwrap(),
                format!("\"{}\"", network.as_str())
            );
        }
    }

    #[test]
    fn test_ordinals_fit_field() {
        for network in RouteNetwork::ALL {
            assert!(network.ordinal() < (1 << NETWORK_BITS));
            assert_eq!(RouteNetwork::from_ordinal(network.ordinal()), network);
        }
        assert_eq!(RouteNetwork::from_ordinal(7), RouteNetwork::Other);
    }
}

//! Per-edge record layout.
//!
//! [`EncodedValues`] hands out typed field handles and assigns each one a
//! bit range inside an [`EdgeFlags`] record. Offsets follow registration
//! order and a field never straddles a 32-bit word.

mod flags;
mod network;
mod values;

use std::collections::{HashMap, HashSet};

pub use flags::EdgeFlags;
pub use network::{RouteNetwork, RouteNetworkEncodedValue};
pub use values::{BooleanEncodedValue, DecimalEncodedValue, IntEncodedValue};

use network::NETWORK_BITS;
use values::Slot;

/// Record-level failures: bad layouts and values that do not fit a field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("value {value} for '{name}' exceeds the storable maximum {max}")]
    ValueOutOfRange { name: String, value: f64, max: f64 },

    #[error("value {value} for '{name}' is not a storable non-negative number")]
    InvalidValue { name: String, value: f64 },

    #[error("encoded value '{0}' is already registered")]
    DuplicateName(String),

    #[error("'{name}' requests {bits} bits, expected 1..=31")]
    InvalidBits { name: String, bits: u32 },

    #[error("'{name}' has non-positive factor {factor}")]
    InvalidFactor { name: String, factor: f64 },
}

/// Sequential bit allocator and registry of field names.
#[derive(Debug, Default)]
pub struct EncodedValues {
    next_bit: u32,
    names: HashSet<String>,
    networks: HashMap<String, RouteNetworkEncodedValue>,
}

impl EncodedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits allocated so far, including padding at word boundaries.
    pub fn bits_used(&self) -> u32 {
        self.next_bit
    }

    /// Number of 32-bit words a record needs for the fields registered so far.
    pub fn words(&self) -> usize {
        self.next_bit.div_ceil(32).max(1) as usize
    }

    /// A zeroed record sized for every registered field.
    pub fn create_edge_flags(&self) -> EdgeFlags {
        EdgeFlags::new(self.words())
    }

    fn claim(&mut self, name: &str, bits: u32) -> Result<(), EncodingError> {
        if !(1..=31).contains(&bits) {
            return Err(EncodingError::InvalidBits {
                name: name.to_string(),
                bits,
            });
        }
        if !self.names.insert(name.to_string()) {
            return Err(EncodingError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn allocate(&mut self, bits: u32) -> Slot {
        if self.next_bit % 32 + bits > 32 {
            self.next_bit = self.next_bit.div_ceil(32) * 32;
        }
        let slot = Slot {
            offset: self.next_bit,
            bits,
        };
        self.next_bit += bits;
        slot
    }

    fn allocate_pair(&mut self, bits: u32, two_directions: bool) -> (Slot, Option<Slot>) {
        let fwd = self.allocate(bits);
        let bwd = two_directions.then(|| self.allocate(bits));
        (fwd, bwd)
    }

    pub fn add_boolean(
        &mut self,
        name: &str,
        two_directions: bool,
    ) -> Result<BooleanEncodedValue, EncodingError> {
        self.claim(name, 1)?;
        let (fwd, bwd) = self.allocate_pair(1, two_directions);
        Ok(BooleanEncodedValue::new(name.to_string(), fwd, bwd))
    }

    pub fn add_decimal(
        &mut self,
        name: &str,
        bits: u32,
        factor: f64,
        two_directions: bool,
    ) -> Result<DecimalEncodedValue, EncodingError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(EncodingError::InvalidFactor {
                name: name.to_string(),
                factor,
            });
        }
        self.claim(name, bits)?;
        let (fwd, bwd) = self.allocate_pair(bits, two_directions);
        Ok(DecimalEncodedValue::new(name.to_string(), bits, factor, fwd, bwd))
    }

    pub fn add_int(
        &mut self,
        name: &str,
        bits: u32,
        two_directions: bool,
    ) -> Result<IntEncodedValue, EncodingError> {
        self.claim(name, bits)?;
        let (fwd, bwd) = self.allocate_pair(bits, two_directions);
        Ok(IntEncodedValue::new(name.to_string(), bits, fwd, bwd))
    }

    /// The route network field called `name`, created on first request.
    ///
    /// Several encoders of the same mode share one network field, so a second
    /// request returns the existing handle instead of failing.
    pub fn route_network(&mut self, name: &str) -> Result<RouteNetworkEncodedValue, EncodingError> {
        if let Some(existing) = self.networks.get(name) {
            return Ok(existing.clone());
        }
        let inner = self.add_int(name, NETWORK_BITS, false)?;
        let network = RouteNetworkEncodedValue::new(inner);
        self.networks.insert(name.to_string(), network.clone());
        Ok(network)
    }
}

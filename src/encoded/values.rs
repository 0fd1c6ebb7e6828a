//! Typed read/write handles for named fields inside an [`EdgeFlags`] record.
//!
//! Every handle addresses a forward slot and, when the field stores two
//! directions, a separate backward slot. Reading or writing the reverse
//! direction of a single-direction field addresses the forward slot.

use super::{EdgeFlags, EncodingError};

/// Bit position of one direction of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub offset: u32,
    pub bits: u32,
}

fn pick(fwd: Slot, bwd: Option<Slot>, reverse: bool) -> Slot {
    match (reverse, bwd) {
        (true, Some(bwd)) => bwd,
        _ => fwd,
    }
}

/// Single-bit flag, e.g. directional access.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanEncodedValue {
    name: String,
    fwd: Slot,
    bwd: Option<Slot>,
}

impl BooleanEncodedValue {
    pub(crate) fn new(name: String, fwd: Slot, bwd: Option<Slot>) -> Self {
        Self { name, fwd, bwd }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stores_two_directions(&self) -> bool {
        self.bwd.is_some()
    }

    pub fn get_bool(&self, reverse: bool, flags: &EdgeFlags) -> bool {
        let slot = pick(self.fwd, self.bwd, reverse);
        flags.get_bits(slot.offset, 1) == 1
    }

    pub fn set_bool(&self, reverse: bool, flags: &mut EdgeFlags, value: bool) {
        let slot = pick(self.fwd, self.bwd, reverse);
        flags.set_bits(slot.offset, 1, value as u32);
    }
}

/// Quantized non-negative decimal: stored as `round(value / factor)` in
/// `bits` bits.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalEncodedValue {
    name: String,
    bits: u32,
    factor: f64,
    fwd: Slot,
    bwd: Option<Slot>,
}

impl DecimalEncodedValue {
    pub(crate) fn new(name: String, bits: u32, factor: f64, fwd: Slot, bwd: Option<Slot>) -> Self {
        Self {
            name,
            bits,
            factor,
            fwd,
            bwd,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn stores_two_directions(&self) -> bool {
        self.bwd.is_some()
    }

    fn max_raw(&self) -> u32 {
        (1u32 << self.bits) - 1
    }

    /// Largest value this field can hold.
    pub fn max_storable_value(&self) -> f64 {
        self.max_raw() as f64 * self.factor
    }

    /// Smallest storable value that is `>= value`, capped at
    /// [`Self::max_storable_value`].
    pub fn next_storable_value(&self, value: f64) -> f64 {
        let raw = (value / self.factor).ceil();
        if raw >= self.max_raw() as f64 {
            return self.max_storable_value();
        }
        raw.max(0.0) * self.factor
    }

    pub fn get_decimal(&self, reverse: bool, flags: &EdgeFlags) -> f64 {
        let slot = pick(self.fwd, self.bwd, reverse);
        flags.get_bits(slot.offset, slot.bits) as f64 * self.factor
    }

    /// Write `value`. Fails instead of truncating when the value is negative,
    /// not finite, or rounds above the storable range.
    pub fn set_decimal(
        &self,
        reverse: bool,
        flags: &mut EdgeFlags,
        value: f64,
    ) -> Result<(), EncodingError> {
        if !value.is_finite() || value < 0.0 {
            return Err(EncodingError::InvalidValue {
                name: self.name.clone(),
                value,
            });
        }
        let raw = (value / self.factor).round();
        if raw > self.max_raw() as f64 {
            return Err(EncodingError::ValueOutOfRange {
                name: self.name.clone(),
                value,
                max: self.max_storable_value(),
            });
        }
        let slot = pick(self.fwd, self.bwd, reverse);
        flags.set_bits(slot.offset, slot.bits, raw as u32);
        Ok(())
    }
}

/// Small unsigned integer, used for enum ordinals.
#[derive(Debug, Clone, PartialEq)]
pub struct IntEncodedValue {
    name: String,
    bits: u32,
    fwd: Slot,
    bwd: Option<Slot>,
}

impl IntEncodedValue {
    pub(crate) fn new(name: String, bits: u32, fwd: Slot, bwd: Option<Slot>) -> Self {
        Self {
            name,
            bits,
            fwd,
            bwd,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_value(&self) -> u32 {
        (1u32 << self.bits) - 1
    }

    pub fn get_int(&self, reverse: bool, flags: &EdgeFlags) -> u32 {
        let slot = pick(self.fwd, self.bwd, reverse);
        flags.get_bits(slot.offset, slot.bits)
    }

    pub fn set_int(&self, reverse: bool, flags: &mut EdgeFlags, value: u32) -> Result<(), EncodingError> {
        if value > self.max_value() {
            return Err(EncodingError::ValueOutOfRange {
                name: self.name.clone(),
                value: value as f64,
                max: self.max_value() as f64,
            });
        }
        let slot = pick(self.fwd, self.bwd, reverse);
        flags.set_bits(slot.offset, slot.bits, value);
        Ok(())
    }
}

//! Encoder facade: one profile bound to its fields in the edge record.

use std::sync::Arc;

use log::debug;

use crate::access::{classify, Access};
use crate::conditional::{ConditionalTagInspector, NoConditionals};
use crate::elevation::corrected_speed;
use crate::encoded::{
    BooleanEncodedValue, DecimalEncodedValue, EdgeFlags, EncodedValues, EncodingError, RouteNetwork,
    RouteNetworkEncodedValue,
};
use crate::priority::{resolve_priority, PriorityCode};
use crate::profiles::{FootProfile, ProfileError};
use crate::speed::{set_speed, way_speed, FerrySpeedCalculator};
use crate::way::{EdgeGeometry, Way};

/// Bits of the priority field.
pub const PRIORITY_BITS: u32 = 5;
/// Resolution of the priority field: one tenth of a code.
pub const PRIORITY_FACTOR: f64 = 0.1;
/// Route network field shared by all walking encoders.
pub const FOOT_NETWORK: &str = "foot_network";

/// Optional features an encoder may offer to weightings and import steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Writes a priority field usable by preference-aware weightings
    PriorityWeighting,
    /// Recomputes speed from slope in [`FootEncoder::apply_way_tags`]
    ElevationCorrection,
}

/// Derives access, speed and priority flags for one walking profile.
#[derive(Clone)]
pub struct FootEncoder {
    profile: Arc<FootProfile>,
    access_enc: BooleanEncodedValue,
    speed_enc: DecimalEncodedValue,
    priority_enc: DecimalEncodedValue,
    network_enc: RouteNetworkEncodedValue,
    ferry_speed: FerrySpeedCalculator,
    conditional: Arc<dyn ConditionalTagInspector>,
}

impl std::fmt::Debug for FootEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FootEncoder")
            .field("profile", &self.profile.name)
            .field("access", &self.access_enc.name())
            .field("speed", &self.speed_enc.name())
            .field("priority", &self.priority_enc.name())
            .field("network", &self.network_enc.name())
            .finish()
    }
}

impl FootEncoder {
    /// Register `<name>_access`, `<name>_average_speed`, `<name>_priority`
    /// and the shared `foot_network` field.
    pub fn new(profile: FootProfile, registry: &mut EncodedValues) -> Result<Self, ProfileError> {
        let name = profile.name.clone();
        let access_enc = registry.add_boolean(&format!("{name}_access"), true)?;
        let speed_enc = registry.add_decimal(
            &format!("{name}_average_speed"),
            profile.speed_bits,
            profile.speed_factor,
            profile.speed_two_directions,
        )?;
        let priority_enc =
            registry.add_decimal(&format!("{name}_priority"), PRIORITY_BITS, PRIORITY_FACTOR, false)?;
        let network_enc = registry.route_network(FOOT_NETWORK)?;
        let ferry_speed = FerrySpeedCalculator::for_profile(profile.speed_factor, profile.max_speed);

        debug!(
            "Registered encoder '{}' ({} bits in use)",
            name,
            registry.bits_used()
        );

        Ok(Self {
            profile: Arc::new(profile),
            access_enc,
            speed_enc,
            priority_enc,
            network_enc,
            ferry_speed,
            conditional: Arc::new(NoConditionals),
        })
    }

    /// Use `inspector` for conditional restrictions instead of ignoring them.
    pub fn with_conditional_inspector(mut self, inspector: Arc<dyn ConditionalTagInspector>) -> Self {
        self.conditional = inspector;
        self
    }

    pub fn profile(&self) -> &FootProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn max_speed(&self) -> f64 {
        self.profile.max_speed
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::PriorityWeighting => true,
            Capability::ElevationCorrection => self.profile.elevation_correction,
        }
    }

    pub fn access(&self, way: &Way) -> Access {
        classify(way, &self.profile, self.conditional.as_ref())
    }

    /// Classify `way` and write access, speed and priority into `flags`.
    ///
    /// Skipped ways leave `flags` untouched. The route network must already be
    /// set in `flags`; it decides the priority bonus.
    pub fn encode(&self, way: &Way, flags: &mut EdgeFlags) -> Result<Access, EncodingError> {
        let access = self.access(way);
        if access.can_skip() {
            return Ok(access);
        }

        let mut bonus = self.profile.route_bonus(self.network_enc.get_network(flags));
        let speed = if access.is_ferry() {
            bonus = Some(PriorityCode::SlightAvoid);
            self.ferry_speed.speed(way)
        } else {
            way_speed(way, &self.profile)
        };

        self.access_enc.set_bool(false, flags, true);
        self.access_enc.set_bool(true, flags, true);
        set_speed(&self.speed_enc, flags, speed, self.profile.max_speed)?;

        let priority = resolve_priority(way, &self.profile, bonus);
        self.priority_enc.set_decimal(false, flags, priority.factor())?;
        Ok(access)
    }

    /// Post-process an edge of `way` once its geometry is known.
    ///
    /// Only profiles with [`Capability::ElevationCorrection`] act. The forward
    /// speed is replaced by the slope speed when the edge is accessible in
    /// either direction. Returns whether the speed was rewritten.
    pub fn apply_way_tags(
        &self,
        way: &Way,
        edge: &impl EdgeGeometry,
        flags: &mut EdgeFlags,
    ) -> Result<bool, EncodingError> {
        if !self.supports(Capability::ElevationCorrection) {
            return Ok(false);
        }
        if !(self.access_enc.get_bool(false, flags) || self.access_enc.get_bool(true, flags)) {
            return Ok(false);
        }
        match corrected_speed(way, edge) {
            Some(speed) => {
                self.speed_enc
                    .set_decimal(false, flags, speed.min(self.profile.max_speed))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set the route network a way belongs to, before [`FootEncoder::encode`].
    pub fn set_route_network(
        &self,
        flags: &mut EdgeFlags,
        network: RouteNetwork,
    ) -> Result<(), EncodingError> {
        self.network_enc.set_network(flags, network)
    }

    pub fn is_accessible(&self, flags: &EdgeFlags, reverse: bool) -> bool {
        self.access_enc.get_bool(reverse, flags)
    }

    pub fn speed(&self, flags: &EdgeFlags, reverse: bool) -> f64 {
        self.speed_enc.get_decimal(reverse, flags)
    }

    /// Stored priority as a weighting factor (code / 10).
    pub fn priority_factor(&self, flags: &EdgeFlags) -> f64 {
        self.priority_enc.get_decimal(false, flags)
    }

    /// Stored priority as a code, `None` if the stored value is not a known code.
    pub fn priority_code(&self, flags: &EdgeFlags) -> Option<PriorityCode> {
        PriorityCode::from_factor(self.priority_factor(flags))
    }
}

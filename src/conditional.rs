//! Conditional access restrictions (`access:conditional` and friends).
//!
//! The encoders only need a yes/no answer, so the evaluation itself sits
//! behind a trait and is injected at construction.

use crate::way::Way;

/// Oracle for time or vehicle dependent restrictions.
pub trait ConditionalTagInspector: Send + Sync {
    /// A way that is restricted by its plain tags is opened by a condition.
    fn is_restricted_way_conditionally_permitted(&self, way: &Way) -> bool;

    /// A way that is open by its plain tags is closed by a condition.
    fn is_permitted_way_conditionally_restricted(&self, way: &Way) -> bool;
}

/// Ignores conditional tags entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConditionals;

impl ConditionalTagInspector for NoConditionals {
    fn is_restricted_way_conditionally_permitted(&self, _way: &Way) -> bool {
        false
    }

    fn is_permitted_way_conditionally_restricted(&self, _way: &Way) -> bool {
        false
    }
}

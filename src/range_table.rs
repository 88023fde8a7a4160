//! # Acceptance range tables
//!
//! A [`RangeTable`] is a right-continuous step function over a non-negative axis (|η| or pt).
//! Each threshold switches the acceptance flag on or off from that value upwards:
//!
//! ```text
//!   flag
//!    on  ─────┐        ┌──────┐
//!             │        │      │
//!   off       └────────┘      └─────────
//!        0   1.37    1.52   2.47        |η|
//! ```
//!
//! The flag at `x` is the flag of the greatest threshold `≤ x`. Every table carries a
//! threshold at `0` (the domain floor), so lookups are defined for every `x ≥ 0`. Negative or
//! `NaN` inputs lie outside the domain and are never allowed.
use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::detector_errors::DetectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTable {
    steps: BTreeMap<OrderedFloat<f64>, bool>,
}

impl RangeTable {
    /// Create a table holding only the domain floor.
    ///
    /// Arguments
    /// -----------------
    /// * `floor`: flag applied from `0` up to the first explicit threshold.
    pub fn new(floor: bool) -> Self {
        let mut steps = BTreeMap::new();
        steps.insert(OrderedFloat(0.0), floor);
        Self { steps }
    }

    /// Build a table from `(threshold, flag)` pairs on top of a floor flag.
    ///
    /// A pair at threshold `0` overrides the floor.
    pub fn from_steps<I>(floor: bool, steps: I) -> Result<Self, DetectorError>
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let mut table = Self::new(floor);
        for (threshold, flag) in steps {
            table.set(threshold, flag)?;
        }
        Ok(table)
    }

    /// Set the flag applied from `threshold` upwards.
    ///
    /// Return
    /// ----------
    /// * `Err(DetectorError::InvalidThreshold)` if `threshold` is negative or not finite.
    pub fn set(&mut self, threshold: f64, flag: bool) -> Result<(), DetectorError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(DetectorError::InvalidThreshold(threshold));
        }
        // -0.0 and 0.0 must land on the same key
        let key = if threshold == 0.0 { 0.0 } else { threshold };
        self.steps.insert(OrderedFloat(key), flag);
        Ok(())
    }

    /// Flag of the greatest threshold `≤ x`, `false` outside the domain.
    pub fn allows(&self, x: f64) -> bool {
        if x.is_nan() {
            return false;
        }
        self.steps
            .range(..=OrderedFloat(x))
            .next_back()
            .is_some_and(|(_, flag)| *flag)
    }

    /// Thresholds and flags in ascending order.
    pub fn steps(&self) -> impl Iterator<Item = (f64, bool)> + '_ {
        self.steps.iter().map(|(k, v)| (k.into_inner(), *v))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for RangeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .steps()
            .map(|(x, flag)| format!("{x} {}", if flag { "on" } else { "off" }))
            .join(", ");
        write!(f, "{rendered}")
    }
}

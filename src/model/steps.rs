use std::collections::BTreeMap;

use tracing::warn;

use crate::model::channel::{Channel, MAX_ORDER};
use crate::model::response::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Step {
    pub expected: Option<Direction>,
    pub calibration: Option<f64>,
}

/// Sparse, read-only mapping from global step order (1..=30) to the step's
/// configuration. Missing orders are unconfigured steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepTable {
    steps: BTreeMap<u8, Step>,
}

impl StepTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a step, keeping the first record for a repeated order. Returns
    /// `false` when the step was not stored.
    pub fn insert(&mut self, order: u8, step: Step) -> bool {
        if order == 0 || order > MAX_ORDER {
            warn!(order, "step order outside 1..={}; ignoring", MAX_ORDER);
            return false;
        }
        if self.steps.contains_key(&order) {
            warn!(order, "duplicate step order; keeping first");
            return false;
        }
        self.steps.insert(order, step);
        true
    }

    pub fn get(&self, order: u8) -> Option<&Step> {
        self.steps.get(&order)
    }

    pub fn expected(&self, order: u8) -> Option<Direction> {
        self.get(order).and_then(|s| s.expected)
    }

    /// Calibration value of the 1-based `step` within `channel`.
    pub fn calibration(&self, channel: Channel, step: u8) -> Option<f64> {
        self.get(channel.order_of(step)).and_then(|s| s.calibration)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn unconfigured_orders(&self) -> Vec<u8> {
        (1..=MAX_ORDER)
            .filter(|order| self.expected(*order).is_none())
            .collect()
    }
}

impl FromIterator<(u8, Step)> for StepTable {
    fn from_iter<I: IntoIterator<Item = (u8, Step)>>(iter: I) -> Self {
        let mut table = StepTable::new();
        for (order, step) in iter {
            table.insert(order, step);
        }
        table
    }
}

/// Step table of one stored test configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StepConfig {
    pub config_id: String,
    pub steps: StepTable,
}

/// Parses a stored decimal. Empty, malformed and non-finite values are absent.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/steps.rs"]
mod tests;

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::types::Resource;

/// Counts of each resource kind, indexed in [`Resource::ALL`] order.
/// Used for player hands, the bank supply, trade maps and costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceBundle {
    counts: [u8; 5],
}

pub const ROAD_COST: ResourceBundle = ResourceBundle::from_counts([1, 1, 0, 0, 0]);
pub const SETTLEMENT_COST: ResourceBundle = ResourceBundle::from_counts([1, 1, 1, 1, 0]);
pub const CITY_COST: ResourceBundle = ResourceBundle::from_counts([0, 0, 0, 2, 3]);
pub const DEVELOPMENT_CARD_COST: ResourceBundle = ResourceBundle::from_counts([0, 0, 1, 1, 1]);

impl ResourceBundle {
    pub const fn new() -> Self {
        Self { counts: [0; 5] }
    }

    /// Counts in lumber, brick, sheep, grain, ore order.
    pub const fn from_counts(counts: [u8; 5]) -> Self {
        Self { counts }
    }

    pub fn uniform(count: u8) -> Self {
        Self { counts: [count; 5] }
    }

    /// Builder-style helper for literals in call sites and tests.
    pub fn with(mut self, resource: Resource, count: u8) -> Self {
        self.counts[resource as usize] += count;
        self
    }

    pub fn get(&self, resource: Resource) -> u8 {
        self.counts[resource as usize]
    }

    pub fn add(&mut self, resource: Resource, count: u8) {
        self.counts[resource as usize] += count;
    }

    pub fn remove(&mut self, resource: Resource, count: u8) {
        debug_assert!(
            self.counts[resource as usize] >= count,
            "resource count would go negative"
        );
        self.counts[resource as usize] -= count;
    }

    pub fn add_bundle(&mut self, other: &ResourceBundle) {
        for index in 0..5 {
            self.counts[index] += other.counts[index];
        }
    }

    pub fn subtract_bundle(&mut self, other: &ResourceBundle) {
        debug_assert!(self.can_afford(other), "bundle subtraction would underflow");
        for index in 0..5 {
            self.counts[index] -= other.counts[index];
        }
    }

    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.counts
            .iter()
            .zip(cost.counts.iter())
            .all(|(have, need)| have >= need)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&count| count as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// True when some kind appears with a positive count in both bundles.
    pub fn overlaps(&self, other: &ResourceBundle) -> bool {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .any(|(a, b)| *a > 0 && *b > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, u8)> + '_ {
        Resource::ALL
            .iter()
            .map(|&resource| (resource, self.get(resource)))
    }

    /// Kinds present with a positive count.
    pub fn kinds(&self) -> impl Iterator<Item = Resource> + '_ {
        self.iter()
            .filter(|(_, count)| *count > 0)
            .map(|(resource, _)| resource)
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "nothing");
        }
        let parts = self
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(resource, count)| format!("{count} {resource}"))
            .join(", ");
        write!(f, "{parts}")
    }
}

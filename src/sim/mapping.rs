//! Mapping builder
//!
//! The full hole → outcome table for one grid. It is rebuilt from scratch
//! whenever the grid changes; nothing is patched incrementally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::hole::Hole;
use super::trace::{Outcome, trace};

/// Outcome for every hole of one grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Indexed by `Hole::index()`
    outcomes: Vec<Outcome>,
}

impl Mapping {
    /// Trace all 16 holes. Each trace keeps its own visited set.
    pub fn build(grid: &Grid) -> Self {
        Self {
            outcomes: Hole::all().map(|hole| trace(grid, hole)).collect(),
        }
    }

    #[inline]
    pub fn outcome(&self, hole: Hole) -> &Outcome {
        &self.outcomes[hole.index()]
    }

    /// (hole, outcome) pairs in hole order
    pub fn iter(&self) -> impl Iterator<Item = (Hole, &Outcome)> {
        Hole::all().zip(self.outcomes.iter())
    }

    /// (start, exit) for every mouse that gets out
    pub fn escapes(&self) -> impl Iterator<Item = (Hole, Hole)> + '_ {
        self.iter()
            .filter_map(|(start, out)| out.exit_hole.map(|exit| (start, exit)))
    }

    pub fn escaping_count(&self) -> usize {
        self.escapes().count()
    }

    pub fn has_escape(&self) -> bool {
        self.escapes().next().is_some()
    }

    /// Start holes grouped by the hole they come out of, exits ascending
    pub fn starts_by_exit(&self) -> BTreeMap<Hole, Vec<Hole>> {
        let mut groups: BTreeMap<Hole, Vec<Hole>> = BTreeMap::new();
        for (start, exit) in self.escapes() {
            groups.entry(exit).or_default().push(start);
        }
        groups
    }

    /// Number of holes whose behaviour agrees with `other`
    pub fn match_count(&self, other: &Mapping) -> usize {
        self.outcomes
            .iter()
            .zip(other.outcomes.iter())
            .filter(|(a, b)| a.same_behavior(b))
            .count()
    }
}

/// Build the hole → outcome table for `grid`.
pub fn build_mapping(grid: &Grid) -> Mapping {
    Mapping::build(grid)
}

//! Deterministic movement planning over terrain costs.

use std::collections::{BTreeMap, BTreeSet};

use vanguard_core::{unit_info, Vector};
use vanguard_world::MapData;

/// Reachability map computed for one unit: every field the unit can
/// enter this turn, with the cheapest cost and the predecessor chain
/// needed to reconstruct the path.
#[derive(Clone, Debug)]
pub struct MovementMap {
    origin: Vector,
    costs: BTreeMap<Vector, u32>,
    parents: BTreeMap<Vector, Vector>,
}

impl MovementMap {
    /// Field the unit starts from.
    #[must_use]
    pub const fn origin(&self) -> Vector {
        self.origin
    }

    /// Cheapest cost to enter the field, if reachable.
    #[must_use]
    pub fn cost(&self, vector: Vector) -> Option<u32> {
        self.costs.get(&vector).copied()
    }

    /// Every reachable field except the origin, in deterministic order.
    #[must_use]
    pub fn reachable(&self) -> Vec<Vector> {
        self.costs
            .keys()
            .filter(|vector| **vector != self.origin)
            .copied()
            .collect()
    }

    /// Path from the origin to the destination, excluding the origin.
    #[must_use]
    pub fn path(&self, to: Vector) -> Option<Vec<Vector>> {
        if !self.costs.contains_key(&to) || to == self.origin {
            return None;
        }
        let mut path = vec![to];
        let mut current = to;
        while let Some(parent) = self.parents.get(&current) {
            if *parent == self.origin {
                break;
            }
            path.push(*parent);
            current = *parent;
        }
        path.reverse();
        Some(path)
    }
}

/// Computes the fields the unit at `from` can reach this turn.
///
/// Expansion is a uniform-cost search over terrain costs with a budget of
/// the unit's movement radius capped by its remaining fuel. Fields held
/// by allied units can be moved through but enemy units block; whether a
/// field is a legal move *destination* is the caller's concern. The
/// frontier is an ordered set, so expansion order is deterministic.
#[must_use]
pub fn movable_area(map: &MapData, from: Vector) -> Option<MovementMap> {
    let unit = map.unit(from)?;
    let info = unit_info(unit.unit_type())?;
    let budget = u32::from(unit.fuel()).min(info.movement_radius);

    let mut costs = BTreeMap::new();
    let mut parents = BTreeMap::new();
    let mut frontier: BTreeSet<(u32, Vector)> = BTreeSet::new();
    let _ = costs.insert(from, 0);
    let _ = frontier.insert((0, from));

    while let Some((cost, vector)) = frontier.iter().next().copied() {
        let _ = frontier.remove(&(cost, vector));
        if costs.get(&vector).copied() != Some(cost) {
            continue;
        }

        for neighbor in vector.adjacent() {
            if !neighbor.within(map.size()) {
                continue;
            }
            let Some(tile) = map.tile_info_at(neighbor) else {
                continue;
            };
            let Some(step) = tile.movement_cost else {
                continue;
            };
            let next_cost = cost + step;
            if next_cost > budget {
                continue;
            }
            if let Some(blocker) = map.unit(neighbor) {
                if map.is_opponent(blocker.player(), unit.player()) {
                    continue;
                }
            }
            let improves = costs
                .get(&neighbor)
                .is_none_or(|existing| next_cost < *existing);
            if improves {
                let _ = costs.insert(neighbor, next_cost);
                let _ = parents.insert(neighbor, vector);
                let _ = frontier.insert((next_cost, neighbor));
            }
        }
    }

    Some(MovementMap {
        origin: from,
        costs,
        parents,
    })
}

//! Teleporter ring targeting.

use vanguard_core::{clockwise_order, tile_info, PlayerId, Vector};
use vanguard_world::MapData;

/// Resolves the exit field for a unit standing on a teleporter.
///
/// All teleporter fields of the same tile type form a ring ordered
/// clockwise around their centroid, ties broken by distance from the
/// centroid. The exit is the successor of the current field, wrapping to
/// the first entry after the last. An exit blocked by a unit, or by a
/// building the traveller's team does not hold, refuses the teleport
/// outright; the ring is never skipped ahead.
#[must_use]
pub fn teleport_target(map: &MapData, from: Vector, player: PlayerId) -> Option<Vector> {
    let tile = map.tile(from)?;
    if !tile_info(tile).is_some_and(|info| info.is_teleporter) {
        return None;
    }

    let mut fields = Vec::new();
    for y in 1..=map.size().height() {
        for x in 1..=map.size().width() {
            let vector = Vector::new(x, y);
            if map.tile(vector) == Some(tile) {
                fields.push(vector);
            }
        }
    }
    if fields.len() < 2 {
        return None;
    }

    let ring = clockwise_order(&fields);
    let index = ring.iter().position(|vector| *vector == from)?;
    let target = ring[(index + 1) % ring.len()];

    if map.unit(target).is_some() {
        return None;
    }
    if let Some(building) = map.building(target) {
        if !map.matches_team(building.player(), player) {
            return None;
        }
    }
    Some(target)
}

//! Per-player fog-of-war projection.
//!
//! Vision is derived, never stored: it is recomputed whenever the map or
//! the viewer changes and must be deterministic for a given pair, since
//! it decides which responses a networked or replayed client may see.
//! Terrain and buildings stay rendered under fog as stale memory; only
//! units are masked outside the visible set.

use std::collections::BTreeSet;

use vanguard_core::{unit_info, PlayerId, Vector};

use crate::{MapData, MapPatch};

/// Sight radius contributed by an owned building.
const BUILDING_VISION: u32 = 1;

/// What one player may legitimately observe of a map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vision {
    viewer: PlayerId,
    fog: bool,
    visible: BTreeSet<Vector>,
}

impl Vision {
    /// Computes the vision of the given viewer over the map.
    #[must_use]
    pub fn compute(map: &MapData, viewer: PlayerId) -> Self {
        if !map.config().fog {
            return Self {
                viewer,
                fog: false,
                visible: BTreeSet::new(),
            };
        }

        let mut visible = BTreeSet::new();
        for (vector, unit) in map.units() {
            if !map.matches_team(unit.player(), viewer) {
                continue;
            }
            let radius = unit_info(unit.unit_type())
                .map(|info| info.vision_radius)
                .unwrap_or(0);
            extend_visible(&mut visible, *vector, radius, map);
        }
        for (vector, building) in map.buildings() {
            if !map.matches_team(building.player(), viewer) {
                continue;
            }
            extend_visible(&mut visible, *vector, BUILDING_VISION, map);
        }

        Self {
            viewer,
            fog: true,
            visible,
        }
    }

    /// The player this vision belongs to.
    #[must_use]
    pub const fn viewer(&self) -> PlayerId {
        self.viewer
    }

    /// Whether the field is currently visible to the viewer.
    #[must_use]
    pub fn is_visible(&self, vector: Vector) -> bool {
        !self.fog || self.visible.contains(&vector)
    }

    /// Projects the map down to what the viewer may observe: units
    /// outside the visible set are masked while terrain and buildings
    /// remain rendered as remembered, stale state.
    #[must_use]
    pub fn apply(&self, map: &MapData) -> MapData {
        if !self.fog {
            return map.clone();
        }

        let units = map
            .units()
            .iter()
            .filter(|(vector, _)| self.is_visible(**vector))
            .map(|(vector, unit)| (*vector, unit.clone()))
            .collect();
        map.copy(MapPatch {
            units: Some(units),
            ..MapPatch::default()
        })
    }

    /// Merges newly revealed placements from the authoritative map into a
    /// fog-masked map without regressing previously known information:
    /// only fields inside the visible set are reconciled.
    #[must_use]
    pub fn update_visible_entities(&self, masked: &MapData, authoritative: &MapData) -> MapData {
        if !self.fog {
            return authoritative.clone();
        }

        let mut units = masked.units().clone();
        let mut buildings = masked.buildings().clone();
        for vector in &self.visible {
            match authoritative.unit(*vector) {
                Some(unit) => {
                    let _ = units.insert(*vector, unit.clone());
                }
                None => {
                    let _ = units.remove(vector);
                }
            }
            match authoritative.building(*vector) {
                Some(building) => {
                    let _ = buildings.insert(*vector, building.clone());
                }
                None => {
                    let _ = buildings.remove(vector);
                }
            }
        }
        masked.copy(MapPatch {
            units: Some(units),
            buildings: Some(buildings),
            ..MapPatch::default()
        })
    }
}

fn extend_visible(visible: &mut BTreeSet<Vector>, origin: Vector, radius: u32, map: &MapData) {
    for vector in origin.expand_star(radius) {
        if vector.within(map.size()) {
            let _ = visible.insert(vector);
        }
    }
}

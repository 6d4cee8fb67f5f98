//! Per-player lifetime counters and their compact wire encoding.

use serde::{Deserialize, Serialize};

/// Fixed-order array encoding of [`PlayerStatistics`].
///
/// The index order is a persistence contract shared with replay logs and
/// saved games: `captured, created_buildings, created_units, damage,
/// destroyed_buildings, destroyed_units, lost_buildings, lost_units`.
pub type PlainPlayerStatistics = [u32; 8];

/// Lifetime counters tracked for a single player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    /// Buildings captured from other owners.
    pub captured: u32,
    /// Buildings constructed.
    pub created_buildings: u32,
    /// Units trained or built.
    pub created_units: u32,
    /// Total health points of damage dealt.
    pub damage: u32,
    /// Enemy buildings destroyed.
    pub destroyed_buildings: u32,
    /// Enemy units destroyed.
    pub destroyed_units: u32,
    /// Own buildings lost.
    pub lost_buildings: u32,
    /// Own units lost.
    pub lost_units: u32,
}

impl PlayerStatistics {
    /// Encodes the counters into the fixed-order array form.
    #[must_use]
    pub const fn to_array(self) -> PlainPlayerStatistics {
        [
            self.captured,
            self.created_buildings,
            self.created_units,
            self.damage,
            self.destroyed_buildings,
            self.destroyed_units,
            self.lost_buildings,
            self.lost_units,
        ]
    }

    /// Decodes counters from the fixed-order array form.
    #[must_use]
    pub const fn from_array(values: PlainPlayerStatistics) -> Self {
        Self {
            captured: values[0],
            created_buildings: values[1],
            created_units: values[2],
            damage: values[3],
            destroyed_buildings: values[4],
            destroyed_units: values[5],
            lost_buildings: values[6],
            lost_units: values[7],
        }
    }
}

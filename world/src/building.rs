//! Building instance state.

use serde::{Deserialize, Serialize};
use vanguard_core::{BuildingTypeId, PlayerId};

use crate::unit::MAX_HEALTH;

/// A building placed on the map. At most one building occupies a field;
/// ownership transfers through capture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    building_type: BuildingTypeId,
    player: PlayerId,
    health: u16,
}

impl Building {
    /// Creates a pristine building owned by the given player. Pass
    /// [`PlayerId::NEUTRAL`] for unclaimed buildings.
    #[must_use]
    pub const fn create(building_type: BuildingTypeId, player: PlayerId) -> Self {
        Self {
            building_type,
            player,
            health: MAX_HEALTH,
        }
    }

    /// Restores a building from its serialized parts.
    #[must_use]
    pub(crate) const fn from_parts(
        building_type: BuildingTypeId,
        player: PlayerId,
        health: u16,
    ) -> Self {
        Self {
            building_type,
            player,
            health,
        }
    }

    /// Catalog type of the building.
    #[must_use]
    pub const fn building_type(&self) -> BuildingTypeId {
        self.building_type
    }

    /// Owning player; neutral for unclaimed buildings.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Current health in the 0..=100 range.
    #[must_use]
    pub const fn health(&self) -> u16 {
        self.health
    }

    /// Returns the building after taking the given damage.
    #[must_use]
    pub fn damaged(mut self, damage: u16) -> Self {
        self.health = self.health.saturating_sub(damage);
        self
    }

    /// Transfers the building to a new owner and restores its structure.
    #[must_use]
    pub fn capture(mut self, player: PlayerId) -> Self {
        self.player = player;
        self.health = MAX_HEALTH;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Building;
    use vanguard_core::{PlayerId, HOUSE};

    #[test]
    fn capture_transfers_ownership_and_repairs() {
        let building = Building::create(HOUSE, PlayerId::NEUTRAL).damaged(40);
        assert_eq!(building.health(), 60);

        let captured = building.capture(PlayerId::new(2));
        assert_eq!(captured.player(), PlayerId::new(2));
        assert_eq!(captured.health(), 100);
    }
}

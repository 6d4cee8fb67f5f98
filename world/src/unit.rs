//! Unit instance state.
//!
//! Units are immutable value objects: every mutator is a `#[must_use]`
//! copy-constructor returning a new value, never an in-place update. A
//! unit occupies exactly one map field unless it is carried by a
//! transport, in which case it is owned by the carrier and absent from
//! the placement map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vanguard_core::{PlayerId, UnitInfo, UnitTypeId, WeaponId};

/// Health of a freshly created or fully healed unit.
pub const MAX_HEALTH: u16 = 100;

/// Maximum transport nesting depth the world accepts: a placed transport
/// may carry units that are themselves loaded transports, but no deeper.
pub const MAX_TRANSPORT_DEPTH: usize = 2;

/// A unit placed on the map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    unit_type: UnitTypeId,
    player: PlayerId,
    health: u16,
    fuel: u16,
    ammo: BTreeMap<WeaponId, u16>,
    name: Option<i32>,
    capturing: bool,
    completed: bool,
    transports: Vec<TransportedUnit>,
}

impl Unit {
    /// Creates a fully supplied, unnamed unit of the given type.
    #[must_use]
    pub fn create(info: &UnitInfo, player: PlayerId) -> Self {
        Self {
            unit_type: info.id,
            player,
            health: MAX_HEALTH,
            fuel: info.fuel_capacity,
            ammo: full_ammo(info),
            name: None,
            capturing: false,
            completed: false,
            transports: Vec::new(),
        }
    }

    /// Restores a unit from its serialized parts without validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        unit_type: UnitTypeId,
        player: PlayerId,
        health: u16,
        fuel: u16,
        ammo: BTreeMap<WeaponId, u16>,
        name: Option<i32>,
        capturing: bool,
        completed: bool,
        transports: Vec<TransportedUnit>,
    ) -> Self {
        Self {
            unit_type,
            player,
            health,
            fuel,
            ammo,
            name,
            capturing,
            completed,
            transports,
        }
    }

    /// Catalog type of the unit.
    #[must_use]
    pub const fn unit_type(&self) -> UnitTypeId {
        self.unit_type
    }

    /// Owning player.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Current health in the 0..=100 range.
    #[must_use]
    pub const fn health(&self) -> u16 {
        self.health
    }

    /// Remaining fuel.
    #[must_use]
    pub const fn fuel(&self) -> u16 {
        self.fuel
    }

    /// Remaining ammunition per weapon.
    #[must_use]
    pub const fn ammo(&self) -> &BTreeMap<WeaponId, u16> {
        &self.ammo
    }

    /// Signed character-name index, if one was assigned.
    #[must_use]
    pub const fn name(&self) -> Option<i32> {
        self.name
    }

    /// Whether the unit is mid-capture on its current field.
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Whether the unit already acted this turn.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Units currently carried by this unit.
    #[must_use]
    pub fn transports(&self) -> &[TransportedUnit] {
        &self.transports
    }

    /// Whether the unit is flagged as its type's leader. Leader status is
    /// encoded in the name's sign so it survives every wire round trip.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.name.is_some_and(|name| name < 0)
    }

    /// Index into the character-name pool, independent of leader status.
    #[must_use]
    pub fn name_index(&self) -> Option<usize> {
        self.name.map(|name| {
            if name < 0 {
                (-name - 1) as usize
            } else {
                name as usize
            }
        })
    }

    /// Returns the unit with the given signed name index.
    #[must_use]
    pub fn with_name(mut self, name: Option<i32>) -> Self {
        self.name = name;
        self
    }

    /// Returns the unit with health clamped into the valid range.
    #[must_use]
    pub fn with_health(mut self, health: u16) -> Self {
        self.health = health.min(MAX_HEALTH);
        self
    }

    /// Returns the unit after taking the given damage.
    #[must_use]
    pub fn damaged(mut self, damage: u16) -> Self {
        self.health = self.health.saturating_sub(damage);
        self
    }

    /// Returns the unit with the given fuel level.
    #[must_use]
    pub fn with_fuel(mut self, fuel: u16) -> Self {
        self.fuel = fuel;
        self
    }

    /// Returns the unit after spending one round from the given weapon.
    /// Weapons with unlimited supply are unaffected.
    #[must_use]
    pub fn consume_ammo(mut self, weapon: WeaponId) -> Self {
        if let Some(rounds) = self.ammo.get_mut(&weapon) {
            *rounds = rounds.saturating_sub(1);
        }
        self
    }

    /// Rounds remaining for the given weapon; `None` marks unlimited
    /// supply.
    #[must_use]
    pub fn rounds(&self, weapon: WeaponId) -> Option<u16> {
        self.ammo.get(&weapon).copied()
    }

    /// Clamps fuel and ammunition to the catalog maxima.
    ///
    /// Idempotent: recovering an already recovered unit changes nothing.
    /// Values within bounds never decrease.
    #[must_use]
    pub fn recover(mut self, info: &UnitInfo) -> Self {
        self.fuel = self.fuel.min(info.fuel_capacity);
        for weapon in info.weapons {
            if let Some(maximum) = weapon.supply {
                if let Some(rounds) = self.ammo.get_mut(&weapon.id) {
                    *rounds = (*rounds).min(maximum);
                }
            }
        }
        self
    }

    /// Refills fuel and ammunition to the catalog maxima.
    #[must_use]
    pub fn resupply(mut self, info: &UnitInfo) -> Self {
        self.fuel = info.fuel_capacity;
        self.ammo = full_ammo(info);
        self
    }

    /// Marks the unit as having acted this turn.
    #[must_use]
    pub fn complete(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Clears the acted-this-turn marker at the start of a turn.
    #[must_use]
    pub fn uncomplete(mut self) -> Self {
        self.completed = false;
        self
    }

    /// Marks the unit as mid-capture.
    #[must_use]
    pub fn start_capture(mut self) -> Self {
        self.capturing = true;
        self
    }

    /// Clears the mid-capture marker.
    #[must_use]
    pub fn stop_capture(mut self) -> Self {
        self.capturing = false;
        self
    }

    /// Loads a unit into this transport.
    #[must_use]
    pub fn load(mut self, unit: TransportedUnit) -> Self {
        self.transports.push(unit);
        self
    }

    /// Unloads the carried unit at the given index, returning the
    /// lightened transport and the extracted unit if the index was valid.
    #[must_use]
    pub fn unload(mut self, index: usize) -> (Self, Option<TransportedUnit>) {
        if index < self.transports.len() {
            let unit = self.transports.remove(index);
            (self, Some(unit))
        } else {
            (self, None)
        }
    }

    /// Whether the transport has no room left.
    #[must_use]
    pub fn is_full(&self, info: &UnitInfo) -> bool {
        self.transports.len() >= info.transport_capacity
    }

    /// Returns the unit with its carried units replaced wholesale.
    #[must_use]
    pub fn replace_transports(mut self, transports: Vec<TransportedUnit>) -> Self {
        self.transports = transports;
        self
    }

    /// Converts the unit into its carried form, shedding per-field state.
    #[must_use]
    pub fn into_transported(self) -> TransportedUnit {
        TransportedUnit {
            unit_type: self.unit_type,
            player: self.player,
            health: self.health,
            fuel: self.fuel,
            ammo: self.ammo,
            name: self.name,
            transports: self.transports,
        }
    }
}

/// A unit carried inside a transport. Carried units shed their per-field
/// state (capture progress, acted marker) and regain it on deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportedUnit {
    unit_type: UnitTypeId,
    player: PlayerId,
    health: u16,
    fuel: u16,
    ammo: BTreeMap<WeaponId, u16>,
    name: Option<i32>,
    transports: Vec<TransportedUnit>,
}

impl TransportedUnit {
    /// Restores a carried unit from its serialized parts.
    #[must_use]
    pub(crate) fn from_parts(
        unit_type: UnitTypeId,
        player: PlayerId,
        health: u16,
        fuel: u16,
        ammo: BTreeMap<WeaponId, u16>,
        name: Option<i32>,
        transports: Vec<TransportedUnit>,
    ) -> Self {
        Self {
            unit_type,
            player,
            health,
            fuel,
            ammo,
            name,
            transports,
        }
    }

    /// Catalog type of the carried unit.
    #[must_use]
    pub const fn unit_type(&self) -> UnitTypeId {
        self.unit_type
    }

    /// Owning player.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Current health of the carried unit.
    #[must_use]
    pub const fn health(&self) -> u16 {
        self.health
    }

    /// Remaining fuel of the carried unit.
    #[must_use]
    pub const fn fuel(&self) -> u16 {
        self.fuel
    }

    /// Remaining ammunition per weapon of the carried unit.
    #[must_use]
    pub const fn ammo(&self) -> &BTreeMap<WeaponId, u16> {
        &self.ammo
    }

    /// Signed character-name index, if one was assigned.
    #[must_use]
    pub const fn name(&self) -> Option<i32> {
        self.name
    }

    /// Units nested inside the carried unit.
    #[must_use]
    pub fn transports(&self) -> &[TransportedUnit] {
        &self.transports
    }

    /// Whether the carried unit is flagged as its type's leader.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.name.is_some_and(|name| name < 0)
    }

    /// Returns the carried unit with the given signed name index.
    #[must_use]
    pub fn with_name(mut self, name: Option<i32>) -> Self {
        self.name = name;
        self
    }

    /// Returns the carried unit with its nested units replaced wholesale.
    #[must_use]
    pub fn replace_transports(mut self, transports: Vec<TransportedUnit>) -> Self {
        self.transports = transports;
        self
    }

    /// Deploys the carried unit back onto the map. Deployed units count
    /// as having acted for the remainder of the turn.
    #[must_use]
    pub fn deploy(self) -> Unit {
        Unit {
            unit_type: self.unit_type,
            player: self.player,
            health: self.health,
            fuel: self.fuel,
            ammo: self.ammo,
            name: self.name,
            capturing: false,
            completed: true,
            transports: self.transports,
        }
    }

    /// Depth of the nesting tree rooted at this carried unit.
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        1 + self
            .transports
            .iter()
            .map(TransportedUnit::nesting_depth)
            .max()
            .unwrap_or(0)
    }
}

fn full_ammo(info: &UnitInfo) -> BTreeMap<WeaponId, u16> {
    info.weapons
        .iter()
        .filter_map(|weapon| weapon.supply.map(|rounds| (weapon.id, rounds)))
        .collect()
}

/// Sign-encodes a name-pool index as a leader name.
#[must_use]
pub const fn leader_name(index: usize) -> i32 {
    -(index as i32) - 1
}

/// Sign-encodes a name-pool index as a follower name.
#[must_use]
pub const fn follower_name(index: usize) -> i32 {
    index as i32
}

#[cfg(test)]
mod tests {
    use super::{follower_name, leader_name, TransportedUnit, Unit, MAX_HEALTH};
    use vanguard_core::{unit_info, PlayerId, WeaponId, SNIPER, TANK};

    fn sniper() -> Unit {
        Unit::create(unit_info(SNIPER).expect("sniper exists"), PlayerId::new(1))
    }

    #[test]
    fn created_units_are_fully_supplied() {
        let unit = sniper();
        assert_eq!(unit.health(), MAX_HEALTH);
        assert_eq!(unit.fuel(), 40);
        assert_eq!(unit.rounds(WeaponId::new(0)), Some(6));
        assert!(!unit.is_completed());
    }

    #[test]
    fn recovery_is_idempotent_and_clamps() {
        let info = unit_info(SNIPER).expect("sniper exists");
        let overfilled = sniper().with_fuel(999);
        let once = overfilled.recover(info);
        assert_eq!(once.fuel(), info.fuel_capacity);
        let twice = once.clone().recover(info);
        assert_eq!(once, twice);
    }

    #[test]
    fn recovery_never_decreases_valid_values() {
        let info = unit_info(SNIPER).expect("sniper exists");
        let low = sniper().with_fuel(3).consume_ammo(WeaponId::new(0));
        let recovered = low.clone().recover(info);
        assert_eq!(recovered, low);
    }

    #[test]
    fn leader_encoding_is_invertible_by_sign() {
        let leader = sniper().with_name(Some(leader_name(4)));
        assert!(leader.is_leader());
        assert_eq!(leader.name_index(), Some(4));

        let follower = sniper().with_name(Some(follower_name(4)));
        assert!(!follower.is_leader());
        assert_eq!(follower.name_index(), Some(4));
    }

    #[test]
    fn ammo_consumption_stops_at_zero() {
        let mut unit = sniper();
        for _ in 0..10 {
            unit = unit.consume_ammo(WeaponId::new(0));
        }
        assert_eq!(unit.rounds(WeaponId::new(0)), Some(0));
    }

    #[test]
    fn transport_round_trip_preserves_identity() {
        let tank = Unit::create(unit_info(TANK).expect("tank exists"), PlayerId::new(2))
            .with_name(Some(1))
            .damaged(30);
        let carried: TransportedUnit = tank.clone().into_transported();
        let deployed = carried.deploy();
        assert_eq!(deployed.unit_type(), tank.unit_type());
        assert_eq!(deployed.health(), tank.health());
        assert_eq!(deployed.name(), tank.name());
        assert!(deployed.is_completed());
    }

    #[test]
    fn nesting_depth_counts_the_tree() {
        let inner = sniper().into_transported();
        let jeep = Unit::create(
            unit_info(vanguard_core::JEEP).expect("jeep exists"),
            PlayerId::new(1),
        )
        .load(inner)
        .into_transported();
        assert_eq!(jeep.nesting_depth(), 2);
    }
}

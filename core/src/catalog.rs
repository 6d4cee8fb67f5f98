//! Process-wide immutable catalogs describing unit, building, and tile
//! types.
//!
//! Catalog entries are configuration, not per-game state: they are shared
//! read-only across every concurrent game and looked up by stable integer
//! identifiers. Lookups on the path of record use the `_or_unknown`
//! variants so a malformed identifier surfaces as a typed fatal error
//! instead of silently resolving to a default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a player slot within a map. Slot `0` is the neutral
/// owner used for unclaimed buildings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// The neutral owner of unclaimed buildings.
    pub const NEUTRAL: PlayerId = PlayerId(0);

    /// Creates a new player identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether the identifier denotes the neutral owner.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.0 == 0
    }
}

/// Identifier of a team grouping one or more players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(u8);

impl TeamId {
    /// Creates a new team identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Identifier of a unit type within the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitTypeId(u16);

impl UnitTypeId {
    /// Creates a new unit type identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Identifier of a building type within the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingTypeId(u16);

impl BuildingTypeId {
    /// Creates a new building type identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Identifier of a tile type within the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u8);

impl TileId {
    /// Creates a new tile identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Identifier of a commander skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillId(u16);

impl SkillId {
    /// Creates a new skill identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Index of a weapon within a unit type's weapon list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(u16);

impl WeaponId {
    /// Creates a new weapon index.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Name pool a unit type draws its character names from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameGender {
    /// Names drawn from the female pool.
    Female,
    /// Names drawn from the male pool.
    Male,
    /// Names drawn from the unspecified pool.
    Unknown,
}

/// Static description of a weapon carried by a unit type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponInfo {
    /// Index of the weapon within the owning unit type.
    pub id: WeaponId,
    /// Base damage dealt by a full-health attacker against zero defense.
    pub damage: u16,
    /// Inclusive minimum and maximum attack range in fields.
    pub range: (u32, u32),
    /// Rounds carried when fully supplied; `None` means unlimited.
    pub supply: Option<u16>,
}

impl WeaponInfo {
    /// Reports whether the weapon can reach a target at the given distance.
    #[must_use]
    pub const fn in_range(&self, distance: u32) -> bool {
        distance >= self.range.0 && distance <= self.range.1
    }
}

/// Static description of a unit type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitInfo {
    /// Stable catalog identifier.
    pub id: UnitTypeId,
    /// Display name of the unit type.
    pub name: &'static str,
    /// Funds required to train or build one instance.
    pub cost: u32,
    /// Maximum movement radius in fields per turn.
    pub movement_radius: u32,
    /// Fuel carried when fully supplied.
    pub fuel_capacity: u16,
    /// Sight radius contributed to the owner's vision.
    pub vision_radius: u32,
    /// Flat damage reduction applied when defending.
    pub defense: u16,
    /// Weapons carried by the unit type, primary first.
    pub weapons: &'static [WeaponInfo],
    /// Whether the unit can capture buildings.
    pub can_capture: bool,
    /// Whether the unit can construct buildings.
    pub can_build: bool,
    /// Number of units the type can carry; zero for non-transports.
    pub transport_capacity: usize,
    /// Name pool used when assigning character names.
    pub gender: NameGender,
}

impl UnitInfo {
    /// Reports whether the unit type can carry other units.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        self.transport_capacity > 0
    }
}

/// Static description of a building type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingInfo {
    /// Stable catalog identifier.
    pub id: BuildingTypeId,
    /// Display name of the building type.
    pub name: &'static str,
    /// Funds required for a builder unit to construct it; `None` for
    /// types that only exist pre-placed, such as headquarters.
    pub cost: Option<u32>,
    /// Funds produced for the owner at the start of every turn.
    pub funds: u32,
    /// Unit types the building can produce.
    pub units: &'static [UnitTypeId],
}

/// Static description of a tile type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileInfo {
    /// Stable catalog identifier.
    pub id: TileId,
    /// Display name of the tile type.
    pub name: &'static str,
    /// Movement cost for ground units; `None` marks impassable terrain.
    pub movement_cost: Option<u32>,
    /// Flat defense bonus granted to units standing on the tile.
    pub cover: u16,
    /// Whether builder units may construct on the tile.
    pub can_build_on: bool,
    /// Whether the tile participates in the teleporter network.
    pub is_teleporter: bool,
}

/// Static description of a commander skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillInfo {
    /// Stable catalog identifier.
    pub id: SkillId,
    /// Display name of the skill.
    pub name: &'static str,
    /// Power charge consumed on activation.
    pub charge_cost: u32,
    /// Whether activation additionally requires a held crystal.
    pub requires_crystal: bool,
}

const PIONEER_WEAPONS: [WeaponInfo; 1] = [WeaponInfo {
    id: WeaponId::new(0),
    damage: 35,
    range: (1, 1),
    supply: None,
}];
const INFANTRY_WEAPONS: [WeaponInfo; 1] = [WeaponInfo {
    id: WeaponId::new(0),
    damage: 50,
    range: (1, 1),
    supply: None,
}];
const SNIPER_WEAPONS: [WeaponInfo; 1] = [WeaponInfo {
    id: WeaponId::new(0),
    damage: 70,
    range: (2, 3),
    supply: Some(6),
}];
const TANK_WEAPONS: [WeaponInfo; 1] = [WeaponInfo {
    id: WeaponId::new(0),
    damage: 75,
    range: (1, 1),
    supply: Some(9),
}];
const ARTILLERY_WEAPONS: [WeaponInfo; 1] = [WeaponInfo {
    id: WeaponId::new(0),
    damage: 85,
    range: (2, 4),
    supply: Some(5),
}];

/// Pioneer unit type: captures and constructs buildings.
pub const PIONEER: UnitTypeId = UnitTypeId::new(1);
/// Infantry unit type: cheap capturing foot soldier.
pub const INFANTRY: UnitTypeId = UnitTypeId::new(2);
/// Sniper unit type: ranged, ammunition-limited foot soldier.
pub const SNIPER: UnitTypeId = UnitTypeId::new(3);
/// Jeep unit type: unarmed two-seat transport.
pub const JEEP: UnitTypeId = UnitTypeId::new(4);
/// Tank unit type: armoured direct-fire vehicle.
pub const TANK: UnitTypeId = UnitTypeId::new(5);
/// Artillery unit type: indirect-fire vehicle that cannot counter.
pub const ARTILLERY: UnitTypeId = UnitTypeId::new(6);

static UNITS: [UnitInfo; 6] = [
    UnitInfo {
        id: PIONEER,
        name: "Pioneer",
        cost: 200,
        movement_radius: 3,
        fuel_capacity: 40,
        vision_radius: 2,
        defense: 5,
        weapons: &PIONEER_WEAPONS,
        can_capture: true,
        can_build: true,
        transport_capacity: 0,
        gender: NameGender::Unknown,
    },
    UnitInfo {
        id: INFANTRY,
        name: "Infantry",
        cost: 300,
        movement_radius: 3,
        fuel_capacity: 50,
        vision_radius: 2,
        defense: 5,
        weapons: &INFANTRY_WEAPONS,
        can_capture: true,
        can_build: false,
        transport_capacity: 0,
        gender: NameGender::Male,
    },
    UnitInfo {
        id: SNIPER,
        name: "Sniper",
        cost: 600,
        movement_radius: 2,
        fuel_capacity: 40,
        vision_radius: 3,
        defense: 5,
        weapons: &SNIPER_WEAPONS,
        can_capture: false,
        can_build: false,
        transport_capacity: 0,
        gender: NameGender::Female,
    },
    UnitInfo {
        id: JEEP,
        name: "Jeep",
        cost: 500,
        movement_radius: 8,
        fuel_capacity: 60,
        vision_radius: 1,
        defense: 10,
        weapons: &[],
        can_capture: false,
        can_build: false,
        transport_capacity: 2,
        gender: NameGender::Unknown,
    },
    UnitInfo {
        id: TANK,
        name: "Tank",
        cost: 1000,
        movement_radius: 6,
        fuel_capacity: 40,
        vision_radius: 2,
        defense: 30,
        weapons: &TANK_WEAPONS,
        can_capture: false,
        can_build: false,
        transport_capacity: 0,
        gender: NameGender::Male,
    },
    UnitInfo {
        id: ARTILLERY,
        name: "Artillery",
        cost: 1200,
        movement_radius: 4,
        fuel_capacity: 30,
        vision_radius: 1,
        defense: 15,
        weapons: &ARTILLERY_WEAPONS,
        can_capture: false,
        can_build: false,
        transport_capacity: 0,
        gender: NameGender::Female,
    },
];

/// Headquarters building type; losing it defeats the owner.
pub const HQ: BuildingTypeId = BuildingTypeId::new(1);
/// House building type; produces funds every turn.
pub const HOUSE: BuildingTypeId = BuildingTypeId::new(2);
/// Barracks building type; trains foot units.
pub const BARRACKS: BuildingTypeId = BuildingTypeId::new(3);
/// Factory building type; builds vehicles.
pub const FACTORY: BuildingTypeId = BuildingTypeId::new(4);

const BARRACKS_UNITS: [UnitTypeId; 3] = [PIONEER, INFANTRY, SNIPER];
const FACTORY_UNITS: [UnitTypeId; 3] = [JEEP, TANK, ARTILLERY];

static BUILDINGS: [BuildingInfo; 4] = [
    BuildingInfo {
        id: HQ,
        name: "HQ",
        cost: None,
        funds: 0,
        units: &[],
    },
    BuildingInfo {
        id: HOUSE,
        name: "House",
        cost: Some(300),
        funds: 100,
        units: &[],
    },
    BuildingInfo {
        id: BARRACKS,
        name: "Barracks",
        cost: Some(500),
        funds: 0,
        units: &BARRACKS_UNITS,
    },
    BuildingInfo {
        id: FACTORY,
        name: "Factory",
        cost: Some(800),
        funds: 0,
        units: &FACTORY_UNITS,
    },
];

/// Plains tile type.
pub const PLAINS: TileId = TileId::new(1);
/// Forest tile type.
pub const FOREST: TileId = TileId::new(2);
/// Mountain tile type.
pub const MOUNTAIN: TileId = TileId::new(3);
/// Road tile type.
pub const ROAD: TileId = TileId::new(4);
/// River tile type.
pub const RIVER: TileId = TileId::new(5);
/// Teleporter tile type; same-type tiles form a warp ring.
pub const TELEPORTER: TileId = TileId::new(6);
/// Sea tile type; impassable to ground units.
pub const SEA: TileId = TileId::new(7);

static TILES: [TileInfo; 7] = [
    TileInfo {
        id: PLAINS,
        name: "Plains",
        movement_cost: Some(1),
        cover: 0,
        can_build_on: true,
        is_teleporter: false,
    },
    TileInfo {
        id: FOREST,
        name: "Forest",
        movement_cost: Some(2),
        cover: 10,
        can_build_on: false,
        is_teleporter: false,
    },
    TileInfo {
        id: MOUNTAIN,
        name: "Mountain",
        movement_cost: Some(3),
        cover: 20,
        can_build_on: false,
        is_teleporter: false,
    },
    TileInfo {
        id: ROAD,
        name: "Road",
        movement_cost: Some(1),
        cover: 0,
        can_build_on: true,
        is_teleporter: false,
    },
    TileInfo {
        id: RIVER,
        name: "River",
        movement_cost: Some(2),
        cover: 0,
        can_build_on: false,
        is_teleporter: false,
    },
    TileInfo {
        id: TELEPORTER,
        name: "Teleporter",
        movement_cost: Some(1),
        cover: 0,
        can_build_on: false,
        is_teleporter: true,
    },
    TileInfo {
        id: SEA,
        name: "Sea",
        movement_cost: None,
        cover: 0,
        can_build_on: false,
        is_teleporter: false,
    },
];

/// Field repairs skill: restores health to every owned unit.
pub const FIELD_REPAIRS: SkillId = SkillId::new(1);
/// War bonds skill: grants an immediate funds payout.
pub const WAR_BONDS: SkillId = SkillId::new(2);

static SKILLS: [SkillInfo; 2] = [
    SkillInfo {
        id: FIELD_REPAIRS,
        name: "Field Repairs",
        charge_cost: 400,
        requires_crystal: false,
    },
    SkillInfo {
        id: WAR_BONDS,
        name: "War Bonds",
        charge_cost: 600,
        requires_crystal: true,
    },
];

/// Fatal error raised when a catalog lookup or tagged-variant dispatch
/// receives an identifier no code path should ever produce.
///
/// This tier marks a programmer or data bug, not a game-rule outcome; it
/// is meant to propagate out of the resolution pipeline unhandled.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{function}: unknown {kind} identifier {value}")]
pub struct UnknownTypeError {
    /// Catalog or variant family the identifier belongs to.
    pub kind: &'static str,
    /// The offending identifier value.
    pub value: u32,
    /// Name of the function that rejected the identifier.
    pub function: &'static str,
}

/// Looks up a unit type description.
#[must_use]
pub fn unit_info(id: UnitTypeId) -> Option<&'static UnitInfo> {
    UNITS.iter().find(|info| info.id == id)
}

/// Looks up a unit type description, failing loudly on unknown ids.
pub fn unit_info_or_unknown(
    id: UnitTypeId,
    function: &'static str,
) -> Result<&'static UnitInfo, UnknownTypeError> {
    unit_info(id).ok_or(UnknownTypeError {
        kind: "unit",
        value: u32::from(id.get()),
        function,
    })
}

/// Looks up a building type description.
#[must_use]
pub fn building_info(id: BuildingTypeId) -> Option<&'static BuildingInfo> {
    BUILDINGS.iter().find(|info| info.id == id)
}

/// Looks up a building type description, failing loudly on unknown ids.
pub fn building_info_or_unknown(
    id: BuildingTypeId,
    function: &'static str,
) -> Result<&'static BuildingInfo, UnknownTypeError> {
    building_info(id).ok_or(UnknownTypeError {
        kind: "building",
        value: u32::from(id.get()),
        function,
    })
}

/// Looks up a tile type description.
#[must_use]
pub fn tile_info(id: TileId) -> Option<&'static TileInfo> {
    TILES.iter().find(|info| info.id == id)
}

/// Looks up a tile type description, failing loudly on unknown ids.
pub fn tile_info_or_unknown(
    id: TileId,
    function: &'static str,
) -> Result<&'static TileInfo, UnknownTypeError> {
    tile_info(id).ok_or(UnknownTypeError {
        kind: "tile",
        value: u32::from(id.get()),
        function,
    })
}

/// Looks up a skill description.
#[must_use]
pub fn skill_info(id: SkillId) -> Option<&'static SkillInfo> {
    SKILLS.iter().find(|info| info.id == id)
}

/// Looks up a skill description, failing loudly on unknown ids.
pub fn skill_info_or_unknown(
    id: SkillId,
    function: &'static str,
) -> Result<&'static SkillInfo, UnknownTypeError> {
    skill_info(id).ok_or(UnknownTypeError {
        kind: "skill",
        value: u32::from(id.get()),
        function,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn catalog_identifiers_are_unique() {
        let unit_ids: BTreeSet<_> = UNITS.iter().map(|info| info.id).collect();
        assert_eq!(unit_ids.len(), UNITS.len());
        let building_ids: BTreeSet<_> = BUILDINGS.iter().map(|info| info.id).collect();
        assert_eq!(building_ids.len(), BUILDINGS.len());
        let tile_ids: BTreeSet<_> = TILES.iter().map(|info| info.id).collect();
        assert_eq!(tile_ids.len(), TILES.len());
    }

    #[test]
    fn unknown_identifiers_fail_loudly() {
        let error = unit_info_or_unknown(UnitTypeId::new(999), "test").expect_err("unknown id");
        assert_eq!(error.kind, "unit");
        assert_eq!(error.value, 999);
        assert!(error.to_string().contains("999"));
    }

    #[test]
    fn production_tables_reference_known_units() {
        for building in &BUILDINGS {
            for unit in building.units {
                assert!(unit_info(*unit).is_some(), "{:?} unknown", unit);
            }
        }
    }

    #[test]
    fn artillery_cannot_fire_point_blank() {
        let info = unit_info(ARTILLERY).expect("artillery exists");
        assert!(!info.weapons[0].in_range(1));
        assert!(info.weapons[0].in_range(3));
    }
}

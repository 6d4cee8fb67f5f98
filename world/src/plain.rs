//! `PlainMap`: the JSON wire and storage projection of [`MapData`].
//!
//! The format is a persistence contract: placements are `[x, y, entity]`
//! triples, statistics are fixed-order 8-element arrays, and transported
//! units nest recursively. `from_plain(to_plain(m))` reproduces `m` for
//! every reachable field.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vanguard_core::{
    BuildingTypeId, PlainPlayerStatistics, PlayerId, PlayerStatistics, SizeVector, SkillId, TeamId,
    TileId, UnitTypeId, UnknownTypeError, Vector, WeaponId,
};

use crate::building::Building;
use crate::player::{Crystal, Player, PlayerControl, Team};
use crate::unit::{TransportedUnit, Unit};
use crate::{MapConfig, MapData};

/// Errors rejected by map construction and decoding.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map dimensions are degenerate.
    #[error("map size {size:?} is invalid")]
    InvalidSize {
        /// The rejected dimensions.
        size: SizeVector,
    },
    /// The tile layer does not cover the map area exactly.
    #[error("expected {expected} tiles, found {found}")]
    TileCountMismatch {
        /// Tiles required by the dimensions.
        expected: usize,
        /// Tiles actually provided.
        found: usize,
    },
    /// A placement lies outside the map bounds.
    #[error("placement at {vector:?} lies outside the map")]
    OutOfBounds {
        /// The rejected position.
        vector: Vector,
    },
    /// Two placements share one field.
    #[error("two placements share the field {vector:?}")]
    DuplicatePlacement {
        /// The contested position.
        vector: Vector,
    },
    /// An entity references a player absent from the roster.
    #[error("player {player:?} is not part of the roster")]
    UnknownPlayer {
        /// The unresolved player reference.
        player: PlayerId,
    },
    /// Two roster entries share one identifier.
    #[error("duplicate player identifier in roster")]
    DuplicatePlayer,
    /// The roster contains no players.
    #[error("a map requires at least one player")]
    EmptyRoster,
    /// The team roster does not partition the players completely.
    #[error("player {player:?} is not cleanly partitioned into a team")]
    TeamMismatch {
        /// The player with inconsistent team membership.
        player: PlayerId,
    },
    /// Transports nest deeper than the engine supports.
    #[error("transport nesting at {vector:?} exceeds the supported depth")]
    TransportDepthExceeded {
        /// Position of the offending transport.
        vector: Vector,
    },
    /// A catalog identifier is unknown.
    #[error(transparent)]
    UnknownType(#[from] UnknownTypeError),
    /// The serialized payload does not parse.
    #[error("could not parse map payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Wire form of a unit, nested recursively for transports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainUnit {
    /// Catalog type identifier.
    pub unit_type: u16,
    /// Owning player identifier.
    pub player: u8,
    /// Current health.
    pub health: u16,
    /// Remaining fuel.
    pub fuel: u16,
    /// Remaining rounds per weapon index.
    pub ammo: Vec<(u16, u16)>,
    /// Signed character-name index.
    pub name: Option<i32>,
    /// Mid-capture marker.
    pub capturing: bool,
    /// Acted-this-turn marker.
    pub completed: bool,
    /// Carried units.
    pub transports: Vec<PlainUnit>,
}

/// Wire form of a building.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainBuilding {
    /// Catalog type identifier.
    pub building_type: u16,
    /// Owning player identifier; zero marks neutral ownership.
    pub player: u8,
    /// Current health.
    pub health: u16,
}

/// Wire form of a player slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainPlayer {
    /// Player identifier.
    pub id: u8,
    /// Current funds.
    pub funds: u32,
    /// Statistics in the fixed-order array encoding.
    pub statistics: PlainPlayerStatistics,
    /// Acquired skill identifiers.
    pub skills: Vec<u16>,
    /// Accumulated power charge.
    pub charge: u32,
    /// Held crystal, if any.
    pub crystal: Option<Crystal>,
    /// Controlling seat.
    pub control: PlayerControl,
}

/// Wire form of a team and the players it contains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainTeam {
    /// Team identifier.
    pub id: u8,
    /// Member players in turn order.
    pub players: Vec<PlainPlayer>,
}

/// JSON-serializable projection of a full [`MapData`] snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlainMap {
    /// Map bounds.
    pub size: SizeVector,
    /// Tile layer in row-major order.
    pub tiles: Vec<u8>,
    /// Unit placements as `[x, y, unit]` triples.
    pub units: Vec<(i32, i32, PlainUnit)>,
    /// Building placements as `[x, y, building]` triples.
    pub buildings: Vec<(i32, i32, PlainBuilding)>,
    /// Team and player roster.
    pub teams: Vec<PlainTeam>,
    /// Static map configuration.
    pub config: MapConfig,
    /// Acting player identifier.
    pub current_player: u8,
    /// Round counter.
    pub round: u32,
}

impl MapData {
    /// Projects the snapshot into its wire form.
    #[must_use]
    pub fn to_plain(&self) -> PlainMap {
        let units = self
            .units()
            .iter()
            .map(|(vector, unit)| (vector.x(), vector.y(), plain_unit(unit)))
            .collect();
        let buildings = self
            .buildings()
            .iter()
            .map(|(vector, building)| (vector.x(), vector.y(), plain_building(building)))
            .collect();
        let teams = self
            .teams()
            .iter()
            .map(|team| PlainTeam {
                id: team.id().get(),
                players: team
                    .players()
                    .iter()
                    .filter_map(|id| self.player(*id))
                    .map(plain_player)
                    .collect(),
            })
            .collect();
        PlainMap {
            size: self.size(),
            tiles: self.tiles().iter().map(|tile| tile.get()).collect(),
            units,
            buildings,
            teams,
            config: self.config().clone(),
            current_player: self.current_player_id().get(),
            round: self.round(),
        }
    }

    /// Reconstructs a validated snapshot from its wire form.
    pub fn from_plain(plain: &PlainMap) -> Result<Self, MapError> {
        let tiles = plain.tiles.iter().map(|tile| TileId::new(*tile)).collect();
        let units = plain
            .units
            .iter()
            .map(|(x, y, unit)| (Vector::new(*x, *y), unit_from_plain(unit)))
            .collect();
        let buildings = plain
            .buildings
            .iter()
            .map(|(x, y, building)| (Vector::new(*x, *y), building_from_plain(building)))
            .collect();
        let mut teams = Vec::with_capacity(plain.teams.len());
        let mut players = Vec::new();
        for team in &plain.teams {
            let team_id = TeamId::new(team.id);
            teams.push(Team::new(
                team_id,
                team.players
                    .iter()
                    .map(|player| PlayerId::new(player.id))
                    .collect(),
            ));
            for player in &team.players {
                players.push(player_from_plain(player, team_id));
            }
        }
        Self::create(
            plain.size,
            tiles,
            units,
            buildings,
            teams,
            players,
            plain.config.clone(),
            PlayerId::new(plain.current_player),
            plain.round,
        )
    }

    /// Serializes the snapshot to its JSON wire string.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.to_plain()).expect("map serialization never fails")
    }

    /// Reconstructs a validated snapshot from its JSON wire string.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let plain: PlainMap = serde_json::from_str(json)?;
        Self::from_plain(&plain)
    }
}

fn plain_unit(unit: &Unit) -> PlainUnit {
    PlainUnit {
        unit_type: unit.unit_type().get(),
        player: unit.player().get(),
        health: unit.health(),
        fuel: unit.fuel(),
        ammo: unit
            .ammo()
            .iter()
            .map(|(weapon, rounds)| (weapon.get(), *rounds))
            .collect(),
        name: unit.name(),
        capturing: unit.is_capturing(),
        completed: unit.is_completed(),
        transports: unit.transports().iter().map(plain_transported).collect(),
    }
}

fn plain_transported(unit: &TransportedUnit) -> PlainUnit {
    PlainUnit {
        unit_type: unit.unit_type().get(),
        player: unit.player().get(),
        health: unit.health(),
        fuel: unit.fuel(),
        ammo: unit
            .ammo()
            .iter()
            .map(|(weapon, rounds)| (weapon.get(), *rounds))
            .collect(),
        name: unit.name(),
        capturing: false,
        completed: false,
        transports: unit.transports().iter().map(plain_transported).collect(),
    }
}

fn unit_from_plain(plain: &PlainUnit) -> Unit {
    Unit::from_parts(
        UnitTypeId::new(plain.unit_type),
        PlayerId::new(plain.player),
        plain.health,
        plain.fuel,
        ammo_from_pairs(&plain.ammo),
        plain.name,
        plain.capturing,
        plain.completed,
        plain.transports.iter().map(transported_from_plain).collect(),
    )
}

fn transported_from_plain(plain: &PlainUnit) -> TransportedUnit {
    TransportedUnit::from_parts(
        UnitTypeId::new(plain.unit_type),
        PlayerId::new(plain.player),
        plain.health,
        plain.fuel,
        ammo_from_pairs(&plain.ammo),
        plain.name,
        plain.transports.iter().map(transported_from_plain).collect(),
    )
}

fn ammo_from_pairs(pairs: &[(u16, u16)]) -> BTreeMap<WeaponId, u16> {
    pairs
        .iter()
        .map(|(weapon, rounds)| (WeaponId::new(*weapon), *rounds))
        .collect()
}

fn plain_building(building: &Building) -> PlainBuilding {
    PlainBuilding {
        building_type: building.building_type().get(),
        player: building.player().get(),
        health: building.health(),
    }
}

fn building_from_plain(plain: &PlainBuilding) -> Building {
    Building::from_parts(
        BuildingTypeId::new(plain.building_type),
        PlayerId::new(plain.player),
        plain.health,
    )
}

fn plain_player(player: &Player) -> PlainPlayer {
    PlainPlayer {
        id: player.id().get(),
        funds: player.funds(),
        statistics: player.statistics().to_array(),
        skills: player.skills().iter().map(|skill| skill.get()).collect(),
        charge: player.charge(),
        crystal: player.crystal(),
        control: player.control().clone(),
    }
}

fn player_from_plain(plain: &PlainPlayer, team: TeamId) -> Player {
    let skills: BTreeSet<SkillId> = plain
        .skills
        .iter()
        .map(|skill| SkillId::new(*skill))
        .collect();
    Player::from_parts(
        PlayerId::new(plain.id),
        team,
        plain.funds,
        PlayerStatistics::from_array(plain.statistics),
        skills,
        plain.charge,
        plain.crystal,
        plain.control.clone(),
    )
}

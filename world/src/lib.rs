#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Immutable world model for the Vanguard engine.
//!
//! [`MapData`] is the aggregate snapshot every system reads and no system
//! mutates: each write produces a new value through [`MapData::copy`].
//! The crate also owns the entity instance state, fog-of-war projection,
//! unit naming, and the `PlainMap` wire format.

mod building;
mod naming;
mod plain;
mod player;
mod unit;
mod vision;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vanguard_core::{
    tile_info, tile_info_or_unknown, unit_info_or_unknown, PlayerId, Reward, SizeVector, TeamId,
    TileId, TileInfo, Vector,
};

pub use building::Building;
pub use naming::{
    assign_deterministic_unit_names, assign_unit_names, deterministic_unit_name, leaders,
    name_pool_size, unit_display_name,
};
pub use plain::{MapError, PlainBuilding, PlainMap, PlainPlayer, PlainTeam, PlainUnit};
pub use player::{Crystal, Player, PlayerControl, Team};
pub use unit::{
    follower_name, leader_name, TransportedUnit, Unit, MAX_HEALTH, MAX_TRANSPORT_DEPTH,
};
pub use vision::Vision;

/// Ways a game can be won beyond the last player standing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WinConditionKind {
    /// Defeat every opposing player.
    Default,
    /// Capture the given number of buildings.
    CaptureAmount {
        /// Captures required to win.
        amount: u32,
    },
    /// Destroy the given number of enemy units.
    DefeatAmount {
        /// Destroyed units required to win.
        amount: u32,
    },
    /// Survive until the given round has been reached.
    Survival {
        /// Round at which survivors win.
        rounds: u32,
    },
}

/// A win condition configured for a map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCondition {
    /// What must happen for the condition to trigger.
    pub kind: WinConditionKind,
    /// Hidden conditions are revealed only when triggered.
    pub hidden: bool,
    /// Reward granted to the triggering player, if any.
    pub reward: Option<Reward>,
}

/// Static configuration of a map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Funds every player starts the game with.
    pub seed_capital: u32,
    /// Whether fog of war restricts each player's view.
    pub fog: bool,
    /// Win conditions evaluated after every state-changing action.
    pub win_conditions: Vec<WinCondition>,
    /// Optional hard round limit after which the game ends in a draw.
    pub round_limit: Option<u32>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed_capital: 0,
            fog: false,
            win_conditions: vec![WinCondition {
                kind: WinConditionKind::Default,
                hidden: false,
                reward: None,
            }],
            round_limit: None,
        }
    }
}

/// Partial update applied through [`MapData::copy`]. Unset fields keep
/// their current value.
#[derive(Clone, Debug, Default)]
pub struct MapPatch {
    /// Replacement tile layer.
    pub tiles: Option<Vec<TileId>>,
    /// Replacement unit placements.
    pub units: Option<BTreeMap<Vector, Unit>>,
    /// Replacement building placements.
    pub buildings: Option<BTreeMap<Vector, Building>>,
    /// Replacement team roster.
    pub teams: Option<Vec<Team>>,
    /// Replacement player roster.
    pub players: Option<BTreeMap<PlayerId, Player>>,
    /// Replacement configuration.
    pub config: Option<MapConfig>,
    /// Replacement acting player.
    pub current_player: Option<PlayerId>,
    /// Replacement round counter.
    pub round: Option<u32>,
}

/// The immutable aggregate snapshot of a running game.
#[derive(Clone, Debug, PartialEq)]
pub struct MapData {
    size: SizeVector,
    tiles: Vec<TileId>,
    units: BTreeMap<Vector, Unit>,
    buildings: BTreeMap<Vector, Building>,
    teams: Vec<Team>,
    players: BTreeMap<PlayerId, Player>,
    config: MapConfig,
    current_player: PlayerId,
    round: u32,
}

impl MapData {
    /// Validated constructor: the only path from raw parameters to a map.
    ///
    /// Rejects placements outside the bounds, unknown catalog
    /// identifiers, entities owned by players absent from the roster,
    /// rosters that do not partition cleanly into teams, and transports
    /// nested beyond [`MAX_TRANSPORT_DEPTH`].
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        size: SizeVector,
        tiles: Vec<TileId>,
        units: Vec<(Vector, Unit)>,
        buildings: Vec<(Vector, Building)>,
        teams: Vec<Team>,
        players: Vec<Player>,
        config: MapConfig,
        current_player: PlayerId,
        round: u32,
    ) -> Result<Self, MapError> {
        if size.width() < 1 || size.height() < 1 {
            return Err(MapError::InvalidSize { size });
        }
        if tiles.len() != size.area() {
            return Err(MapError::TileCountMismatch {
                expected: size.area(),
                found: tiles.len(),
            });
        }
        for tile in &tiles {
            let _ = tile_info_or_unknown(*tile, "MapData::create")?;
        }

        let mut roster: BTreeMap<PlayerId, Player> = BTreeMap::new();
        for player in players {
            if player.id().is_neutral() {
                return Err(MapError::UnknownPlayer {
                    player: player.id(),
                });
            }
            if roster.insert(player.id(), player).is_some() {
                return Err(MapError::DuplicatePlayer);
            }
        }
        if roster.is_empty() {
            return Err(MapError::EmptyRoster);
        }
        for player in roster.values() {
            let team = teams.iter().find(|team| team.id() == player.team());
            let listed = team.is_some_and(|team| team.players().contains(&player.id()));
            if !listed {
                return Err(MapError::TeamMismatch {
                    player: player.id(),
                });
            }
        }
        for team in &teams {
            for member in team.players() {
                let in_roster_team = roster
                    .get(member)
                    .is_some_and(|player| player.team() == team.id());
                if !in_roster_team {
                    return Err(MapError::TeamMismatch { player: *member });
                }
            }
        }

        let mut unit_map: BTreeMap<Vector, Unit> = BTreeMap::new();
        for (vector, unit) in units {
            if !vector.within(size) {
                return Err(MapError::OutOfBounds { vector });
            }
            let _ = unit_info_or_unknown(unit.unit_type(), "MapData::create")?;
            if unit.player().is_neutral() || !roster.contains_key(&unit.player()) {
                return Err(MapError::UnknownPlayer {
                    player: unit.player(),
                });
            }
            let depth = unit
                .transports()
                .iter()
                .map(TransportedUnit::nesting_depth)
                .max()
                .unwrap_or(0);
            if depth > MAX_TRANSPORT_DEPTH {
                return Err(MapError::TransportDepthExceeded { vector });
            }
            if unit_map.insert(vector, unit).is_some() {
                return Err(MapError::DuplicatePlacement { vector });
            }
        }

        let mut building_map: BTreeMap<Vector, Building> = BTreeMap::new();
        for (vector, building) in buildings {
            if !vector.within(size) {
                return Err(MapError::OutOfBounds { vector });
            }
            let _ =
                vanguard_core::building_info_or_unknown(building.building_type(), "MapData::create")?;
            if !building.player().is_neutral() && !roster.contains_key(&building.player()) {
                return Err(MapError::UnknownPlayer {
                    player: building.player(),
                });
            }
            if building_map.insert(vector, building).is_some() {
                return Err(MapError::DuplicatePlacement { vector });
            }
        }

        if !roster.contains_key(&current_player) {
            return Err(MapError::UnknownPlayer {
                player: current_player,
            });
        }

        Ok(Self {
            size,
            tiles,
            units: unit_map,
            buildings: building_map,
            teams,
            players: roster,
            config,
            current_player,
            round,
        })
    }

    /// Bounds of the map.
    #[must_use]
    pub const fn size(&self) -> SizeVector {
        self.size
    }

    /// Round counter, starting at 1.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Static configuration of the map.
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Tile layer in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Tile at the given position.
    #[must_use]
    pub fn tile(&self, vector: Vector) -> Option<TileId> {
        if !vector.within(self.size) {
            return None;
        }
        let index = (vector.y() - 1) * self.size.width() + (vector.x() - 1);
        self.tiles.get(index as usize).copied()
    }

    /// Catalog description of the tile at the given position.
    #[must_use]
    pub fn tile_info_at(&self, vector: Vector) -> Option<&'static TileInfo> {
        self.tile(vector).and_then(tile_info)
    }

    /// Unit placements keyed by position, in deterministic order.
    #[must_use]
    pub const fn units(&self) -> &BTreeMap<Vector, Unit> {
        &self.units
    }

    /// Building placements keyed by position, in deterministic order.
    #[must_use]
    pub const fn buildings(&self) -> &BTreeMap<Vector, Building> {
        &self.buildings
    }

    /// Unit at the given position, if any.
    #[must_use]
    pub fn unit(&self, vector: Vector) -> Option<&Unit> {
        self.units.get(&vector)
    }

    /// Building at the given position, if any.
    #[must_use]
    pub fn building(&self, vector: Vector) -> Option<&Building> {
        self.buildings.get(&vector)
    }

    /// Team roster in turn order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Player roster keyed by identifier.
    #[must_use]
    pub const fn players(&self) -> &BTreeMap<PlayerId, Player> {
        &self.players
    }

    /// Player slot with the given identifier.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Identifier of the acting player.
    #[must_use]
    pub const fn current_player_id(&self) -> PlayerId {
        self.current_player
    }

    /// The acting player. The constructor guarantees the slot exists.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        self.players
            .get(&self.current_player)
            .expect("current player is validated at construction")
    }

    /// First human-controlled player in identifier order, if any.
    #[must_use]
    pub fn first_human_player(&self) -> Option<PlayerId> {
        self.players
            .values()
            .find(|player| player.is_human())
            .map(Player::id)
    }

    /// Team the given player belongs to.
    #[must_use]
    pub fn team_of(&self, id: PlayerId) -> Option<TeamId> {
        self.players.get(&id).map(Player::team)
    }

    /// Whether both identifiers denote the same non-neutral player.
    #[must_use]
    pub fn matches_player(&self, a: PlayerId, b: PlayerId) -> bool {
        !a.is_neutral() && a == b
    }

    /// Whether both players belong to the same team.
    #[must_use]
    pub fn matches_team(&self, a: PlayerId, b: PlayerId) -> bool {
        match (self.team_of(a), self.team_of(b)) {
            (Some(team_a), Some(team_b)) => team_a == team_b,
            _ => false,
        }
    }

    /// Whether both players are non-neutral members of opposing teams.
    #[must_use]
    pub fn is_opponent(&self, a: PlayerId, b: PlayerId) -> bool {
        !a.is_neutral() && !b.is_neutral() && !self.matches_team(a, b)
    }

    /// Identifier of the player whose turn follows the acting player's,
    /// wrapping to the lowest identifier at the end of a round.
    #[must_use]
    pub fn next_player(&self) -> PlayerId {
        let mut ids = self.players.keys().copied();
        let first = ids.clone().next().expect("roster is never empty");
        ids.find(|id| *id > self.current_player).unwrap_or(first)
    }

    /// Produces a new snapshot with the patched fields replaced.
    ///
    /// The call is side-effect free: the receiver is untouched and the
    /// returned value shares no mutable state with it.
    #[must_use]
    pub fn copy(&self, patch: MapPatch) -> Self {
        Self {
            size: self.size,
            tiles: patch.tiles.unwrap_or_else(|| self.tiles.clone()),
            units: patch.units.unwrap_or_else(|| self.units.clone()),
            buildings: patch.buildings.unwrap_or_else(|| self.buildings.clone()),
            teams: patch.teams.unwrap_or_else(|| self.teams.clone()),
            players: patch.players.unwrap_or_else(|| self.players.clone()),
            config: patch.config.unwrap_or_else(|| self.config.clone()),
            current_player: patch.current_player.unwrap_or(self.current_player),
            round: patch.round.unwrap_or(self.round),
        }
    }

    /// Convenience copy replacing a single unit placement.
    #[must_use]
    pub fn update_unit(&self, vector: Vector, unit: Unit) -> Self {
        let mut units = self.units.clone();
        let _ = units.insert(vector, unit);
        self.copy(MapPatch {
            units: Some(units),
            ..MapPatch::default()
        })
    }

    /// Convenience copy removing a unit placement.
    #[must_use]
    pub fn remove_unit(&self, vector: Vector) -> Self {
        let mut units = self.units.clone();
        let _ = units.remove(&vector);
        self.copy(MapPatch {
            units: Some(units),
            ..MapPatch::default()
        })
    }

    /// Convenience copy replacing a single building placement.
    #[must_use]
    pub fn update_building(&self, vector: Vector, building: Building) -> Self {
        let mut buildings = self.buildings.clone();
        let _ = buildings.insert(vector, building);
        self.copy(MapPatch {
            buildings: Some(buildings),
            ..MapPatch::default()
        })
    }

    /// Convenience copy removing a building placement.
    #[must_use]
    pub fn remove_building(&self, vector: Vector) -> Self {
        let mut buildings = self.buildings.clone();
        let _ = buildings.remove(&vector);
        self.copy(MapPatch {
            buildings: Some(buildings),
            ..MapPatch::default()
        })
    }

    /// Convenience copy replacing a player slot.
    #[must_use]
    pub fn update_player(&self, player: Player) -> Self {
        let mut players = self.players.clone();
        let _ = players.insert(player.id(), player);
        self.copy(MapPatch {
            players: Some(players),
            ..MapPatch::default()
        })
    }
}

/// Query functions providing derived read-only views of a map.
pub mod query {
    use super::{MapData, Player, TransportedUnit, Unit};
    use vanguard_core::{building_info, PlayerId, Vector, HQ};

    /// Funds produced for the player at the start of each of their turns.
    #[must_use]
    pub fn income(map: &MapData, player: PlayerId) -> u32 {
        map.buildings()
            .values()
            .filter(|building| map.matches_player(building.player(), player))
            .filter_map(|building| building_info(building.building_type()))
            .map(|info| info.funds)
            .sum()
    }

    /// Number of units the player fields, including transported units.
    #[must_use]
    pub fn unit_count(map: &MapData, player: PlayerId) -> usize {
        map.units()
            .values()
            .filter(|unit| map.matches_player(unit.player(), player))
            .map(|unit| 1 + carried_count(unit.transports()))
            .sum()
    }

    /// Whether the player still owns a headquarters.
    #[must_use]
    pub fn owns_hq(map: &MapData, player: PlayerId) -> bool {
        map.buildings().values().any(|building| {
            building.building_type() == HQ && map.matches_player(building.player(), player)
        })
    }

    /// Positions of the player's units, in deterministic order.
    #[must_use]
    pub fn unit_positions(map: &MapData, player: PlayerId) -> Vec<Vector> {
        map.units()
            .iter()
            .filter(|(_, unit)| map.matches_player(unit.player(), player))
            .map(|(vector, _)| *vector)
            .collect()
    }

    /// Non-neutral players that are not yet defeated, in identifier
    /// order. A player stays in the game while they field a unit or own
    /// a headquarters.
    #[must_use]
    pub fn active_players(map: &MapData) -> Vec<PlayerId> {
        map.players()
            .values()
            .map(Player::id)
            .filter(|player| unit_count(map, *player) > 0 || owns_hq(map, *player))
            .collect()
    }

    fn carried_count(transports: &[TransportedUnit]) -> usize {
        transports
            .iter()
            .map(|unit| 1 + carried_count(unit.transports()))
            .sum()
    }

    /// Whether the unit may still be ordered this turn by the player.
    #[must_use]
    pub fn is_orderable(map: &MapData, vector: Vector, player: PlayerId) -> bool {
        map.unit(vector)
            .is_some_and(|unit: &Unit| map.matches_player(unit.player(), player) && !unit.is_completed())
    }
}

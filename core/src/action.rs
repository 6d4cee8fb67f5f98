//! The message surface of the engine: unresolved player intents and the
//! resolved state-transition events they produce.
//!
//! An [`Action`] is an intent submitted by a player or an AI. Resolution
//! turns it into an ordered sequence of [`ActionResponse`] values, the
//! append-only event log that replays, undo, and multiplayer all consume.

use serde::{Deserialize, Serialize};

use crate::catalog::{BuildingTypeId, PlayerId, SkillId, TeamId, UnitTypeId};
use crate::vector::Vector;

/// Unresolved intent submitted to the action-resolution pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Begins the game: seeds funds, recovers units, assigns names.
    Start,
    /// Moves a unit along the cheapest path, loading it into a transport
    /// when the destination holds a friendly carrier with room.
    Move {
        /// Field the unit currently occupies.
        from: Vector,
        /// Destination field.
        to: Vector,
    },
    /// Unloads a transported unit onto an adjacent field.
    DropUnit {
        /// Field the transport occupies.
        from: Vector,
        /// Index of the carried unit within the transport.
        index: usize,
        /// Field the unit is dropped onto.
        to: Vector,
    },
    /// Attacks an enemy unit.
    AttackUnit {
        /// Field of the attacking unit.
        from: Vector,
        /// Field of the defending unit.
        to: Vector,
    },
    /// Attacks an enemy building.
    AttackBuilding {
        /// Field of the attacking unit.
        from: Vector,
        /// Field of the targeted building.
        to: Vector,
    },
    /// Advances the capture of the building under the acting unit.
    Capture {
        /// Field of the capturing unit.
        at: Vector,
    },
    /// Trains or builds a unit at a production building.
    CreateUnit {
        /// Field of the producing building.
        at: Vector,
        /// Catalog type of the unit to create.
        unit_type: UnitTypeId,
    },
    /// Constructs a building with a builder unit.
    CreateBuilding {
        /// Field of the builder unit.
        at: Vector,
        /// Catalog type of the building to construct.
        building_type: BuildingTypeId,
    },
    /// Activates a charged commander skill.
    ActivatePower {
        /// Skill to activate.
        skill: SkillId,
    },
    /// Consumes the held crystal to gain power charge.
    ActivateCrystal,
    /// Orders a unit to hold position, finishing its turn.
    CompleteUnit {
        /// Field of the unit.
        at: Vector,
    },
    /// Ends the current player's turn.
    EndTurn,
}

/// Reward granted by a win condition or a scripted effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Reward {
    /// A one-time funds payout.
    Funds {
        /// Amount credited to the receiving player.
        amount: u32,
    },
    /// Permanent acquisition of a commander skill.
    Skill {
        /// Skill granted to the receiving player.
        skill: SkillId,
    },
}

/// One resolved, atomic state transition emitted by the action layer.
///
/// Responses are emitted in a strict rule-determined order and must be
/// applied in that order; the sequence forms the replay log of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionResponse {
    /// The game started. Also the safe fallback for malformed payloads.
    Start,
    /// A unit moved along the given path.
    Move {
        /// Field the unit left.
        from: Vector,
        /// Field the unit arrived at, possibly via teleporter.
        to: Vector,
        /// Every field entered in order, excluding `from`.
        path: Vec<Vector>,
        /// Fuel remaining after the move.
        fuel: u16,
        /// Whether the unit was loaded into a transport at `to`.
        loaded: bool,
    },
    /// A transported unit was dropped onto an adjacent field.
    DropUnit {
        /// Field of the transport.
        from: Vector,
        /// Index of the carried unit that was unloaded.
        index: usize,
        /// Field the unit was dropped onto.
        to: Vector,
    },
    /// A unit attacked an enemy unit.
    AttackUnit {
        /// Field of the attacker.
        from: Vector,
        /// Field of the defender.
        to: Vector,
        /// Damage dealt to the defender.
        damage: u16,
        /// Damage dealt back by a surviving defender, if any.
        counter_damage: Option<u16>,
    },
    /// A unit was destroyed and removed from the map.
    UnitDestroyed {
        /// Field the unit occupied.
        at: Vector,
        /// Owner of the destroyed unit.
        player: PlayerId,
    },
    /// A unit attacked an enemy building.
    AttackBuilding {
        /// Field of the attacker.
        from: Vector,
        /// Field of the building.
        to: Vector,
        /// Damage dealt to the building.
        damage: u16,
    },
    /// A building was destroyed and removed from the map.
    BuildingDestroyed {
        /// Field the building occupied.
        at: Vector,
        /// Owner of the destroyed building.
        player: PlayerId,
    },
    /// A unit began capturing the building beneath it.
    CaptureStarted {
        /// Field of the capturing unit.
        at: Vector,
        /// Player performing the capture.
        player: PlayerId,
    },
    /// A building changed owners through capture.
    CaptureBuilding {
        /// Field of the captured building.
        at: Vector,
        /// New owner of the building.
        player: PlayerId,
    },
    /// A unit was created at a production building.
    CreateUnit {
        /// Field the unit appeared on.
        at: Vector,
        /// Catalog type of the created unit.
        unit_type: UnitTypeId,
        /// Owner of the created unit.
        player: PlayerId,
        /// Signed character-name index assigned at creation.
        name: Option<i32>,
        /// Whether the unit was granted without cost.
        free: bool,
    },
    /// A building was constructed by a builder unit.
    CreateBuilding {
        /// Field the building appeared on.
        at: Vector,
        /// Catalog type of the constructed building.
        building_type: BuildingTypeId,
    },
    /// A commander skill was activated.
    ActivatePower {
        /// Player that activated the skill.
        player: PlayerId,
        /// The activated skill.
        skill: SkillId,
    },
    /// A crystal was consumed for power charge.
    ActivateCrystal {
        /// Player that consumed the crystal.
        player: PlayerId,
    },
    /// Bookkeeping marker: the unit at the field finished acting.
    CompleteUnit {
        /// Field of the completed unit.
        at: Vector,
    },
    /// The turn passed to the next player.
    EndTurn {
        /// Player whose turn ended.
        previous: PlayerId,
        /// Player whose turn begins.
        next: PlayerId,
        /// Round number after the transition.
        round: u32,
    },
    /// A player received a scripted or win-condition reward.
    ReceiveReward {
        /// Receiving player.
        player: PlayerId,
        /// The granted reward.
        reward: Reward,
    },
    /// A scripted character spoke.
    CharacterMessage {
        /// Player the speaking character belongs to.
        player: PlayerId,
        /// Unit type portraying the character.
        unit_type: UnitTypeId,
        /// The spoken line.
        message: String,
    },
    /// A hidden objective was revealed by triggering it.
    SecretDiscovered {
        /// Index of the revealed win condition.
        condition: usize,
    },
    /// Marker re-rooting subsequent responses to a viewer's perspective.
    SetViewer {
        /// Player whose perspective applies from here on.
        player: PlayerId,
    },
    /// The game ended.
    GameEnd {
        /// Winning team, or `None` for a draw.
        winning_team: Option<TeamId>,
        /// Index of the satisfied win condition, if one triggered.
        condition: Option<usize>,
    },
}

impl ActionResponse {
    /// Reports whether the response is pure bookkeeping rather than a
    /// user-visible transition. Undo strips trailing bookkeeping before
    /// counting actions.
    #[must_use]
    pub const fn is_bookkeeping(&self) -> bool {
        matches!(self, Self::CompleteUnit { .. } | Self::SetViewer { .. })
    }
}

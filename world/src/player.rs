//! Player and team instance state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use vanguard_core::{PlayerId, PlayerStatistics, SkillId, TeamId};

/// Crystals gate certain commander powers during invasions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crystal {
    /// Standard command crystal.
    Command,
    /// Phantom crystal carried by invading commanders.
    Phantom,
}

/// Who issues actions for a player slot.
///
/// A tagged variant, not a behavioural hierarchy: the engine treats both
/// identically and only the turn loop consults the distinction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerControl {
    /// A human seat bound to an external user identifier.
    Human {
        /// Opaque user identifier owned by the surrounding service.
        user: String,
    },
    /// A computer seat driven by the named AI strategy.
    Computer {
        /// Registry key of the evaluation strategy.
        strategy: String,
    },
}

/// A player participating in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    team: TeamId,
    funds: u32,
    statistics: PlayerStatistics,
    skills: BTreeSet<SkillId>,
    charge: u32,
    crystal: Option<Crystal>,
    control: PlayerControl,
}

impl Player {
    /// Creates a new player slot.
    #[must_use]
    pub fn new(id: PlayerId, team: TeamId, funds: u32, control: PlayerControl) -> Self {
        Self {
            id,
            team,
            funds,
            statistics: PlayerStatistics::default(),
            skills: BTreeSet::new(),
            charge: 0,
            crystal: None,
            control,
        }
    }

    /// Restores a player from serialized parts.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: PlayerId,
        team: TeamId,
        funds: u32,
        statistics: PlayerStatistics,
        skills: BTreeSet<SkillId>,
        charge: u32,
        crystal: Option<Crystal>,
        control: PlayerControl,
    ) -> Self {
        Self {
            id,
            team,
            funds,
            statistics,
            skills,
            charge,
            crystal,
            control,
        }
    }

    /// Identifier of the player slot.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Team the player belongs to.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Current funds.
    #[must_use]
    pub const fn funds(&self) -> u32 {
        self.funds
    }

    /// Lifetime statistics counters.
    #[must_use]
    pub const fn statistics(&self) -> PlayerStatistics {
        self.statistics
    }

    /// Skills the player has acquired.
    #[must_use]
    pub const fn skills(&self) -> &BTreeSet<SkillId> {
        &self.skills
    }

    /// Accumulated power charge.
    #[must_use]
    pub const fn charge(&self) -> u32 {
        self.charge
    }

    /// Crystal the player currently holds, if any.
    #[must_use]
    pub const fn crystal(&self) -> Option<Crystal> {
        self.crystal
    }

    /// Who controls the seat.
    #[must_use]
    pub const fn control(&self) -> &PlayerControl {
        &self.control
    }

    /// Whether the seat is human controlled.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(self.control, PlayerControl::Human { .. })
    }

    /// Returns the player with the given funds.
    #[must_use]
    pub fn with_funds(mut self, funds: u32) -> Self {
        self.funds = funds;
        self
    }

    /// Returns the player with the amount credited.
    #[must_use]
    pub fn earn(mut self, amount: u32) -> Self {
        self.funds = self.funds.saturating_add(amount);
        self
    }

    /// Returns the player with the amount debited, or `None` when funds
    /// are insufficient.
    #[must_use]
    pub fn spend(mut self, amount: u32) -> Option<Self> {
        self.funds = self.funds.checked_sub(amount)?;
        Some(self)
    }

    /// Returns the player with replaced statistics.
    #[must_use]
    pub fn with_statistics(mut self, statistics: PlayerStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Returns the player with additional power charge.
    #[must_use]
    pub fn charge_power(mut self, amount: u32) -> Self {
        self.charge = self.charge.saturating_add(amount);
        self
    }

    /// Returns the player with charge debited, or `None` when the charge
    /// is insufficient.
    #[must_use]
    pub fn consume_charge(mut self, amount: u32) -> Option<Self> {
        self.charge = self.charge.checked_sub(amount)?;
        Some(self)
    }

    /// Returns the player holding the given crystal.
    #[must_use]
    pub fn with_crystal(mut self, crystal: Option<Crystal>) -> Self {
        self.crystal = crystal;
        self
    }

    /// Returns the player with the skill acquired.
    #[must_use]
    pub fn learn_skill(mut self, skill: SkillId) -> Self {
        let _ = self.skills.insert(skill);
        self
    }
}

/// An ordered group of players sharing victory and defeat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    players: Vec<PlayerId>,
}

impl Team {
    /// Creates a team over the given player slots.
    #[must_use]
    pub fn new(id: TeamId, players: Vec<PlayerId>) -> Self {
        Self { id, players }
    }

    /// Identifier of the team.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Player slots belonging to the team, in turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted, trigger-keyed effect tables layered atop action resolution.
//!
//! Effects map a trigger to weighted candidate lists of scripted
//! responses (dialogue, funds grants, crystal activation). Candidates
//! are filtered for eligibility first; the weighted draw runs only over
//! what survives, and every draw goes through an injectable RNG so tests
//! can supply a seeded sequence and assert exact selection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use vanguard_core::{ActionResponse, PlayerId, Reward, UnitTypeId};
use vanguard_world::MapData;

/// Moments in a game an effect table can hook into.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TriggerKind {
    /// The game started.
    GameStart,
    /// A turn ended.
    EndTurn,
    /// A building changed owners.
    CaptureBuilding,
    /// A unit was destroyed.
    UnitDestroyed,
    /// The game ended.
    GameEnd,
}

/// Qualifying condition narrowing a table to specific circumstances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCondition {
    /// Restricts the table to one acting player.
    pub player: Option<PlayerId>,
}

impl EffectCondition {
    fn matches(&self, player: PlayerId) -> bool {
        self.player.is_none() || self.player == Some(player)
    }
}

/// A scripted response an effect table may produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScriptedResponse {
    /// A character portrayed by a unit type speaks a line.
    CharacterMessage {
        /// Unit type portraying the speaker.
        unit_type: UnitTypeId,
        /// The spoken line.
        message: String,
    },
    /// The acting player receives funds.
    GrantFunds {
        /// Amount credited.
        amount: u32,
    },
    /// The acting player's crystal activates.
    ActivateCrystal,
}

/// A weighted candidate within an effect table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCandidate {
    /// The scripted response produced when this candidate is drawn.
    pub response: ScriptedResponse,
    /// Relative selection weight.
    pub weight: u32,
}

/// One table: a qualifying condition plus its weighted candidates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEntry {
    /// Circumstances under which the table applies.
    pub condition: EffectCondition,
    /// Weighted candidates drawn from when the table applies.
    pub candidates: Vec<EffectCandidate>,
}

/// The full trigger-keyed effect configuration of a game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    tables: Vec<(TriggerKind, EffectEntry)>,
}

impl Effects {
    /// Creates an empty effect configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds a table for the given trigger.
    #[must_use]
    pub fn with_table(mut self, trigger: TriggerKind, entry: EffectEntry) -> Self {
        self.tables.push((trigger, entry));
        self
    }

    /// Whether any tables are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Runs the tables registered for a trigger on behalf of the acting
    /// player, returning the scripted responses in table order.
    ///
    /// Candidates are filtered for eligibility before the weighted draw:
    /// a message whose portraying unit type the player does not currently
    /// field is never selectable, regardless of its weight.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        map: &MapData,
        trigger: TriggerKind,
        player: PlayerId,
        rng: &mut R,
    ) -> Vec<ActionResponse> {
        let mut responses = Vec::new();
        for (kind, entry) in &self.tables {
            if *kind != trigger || !entry.condition.matches(player) {
                continue;
            }
            let eligible: Vec<(&ScriptedResponse, u32)> = entry
                .candidates
                .iter()
                .filter(|candidate| is_eligible(map, player, &candidate.response))
                .map(|candidate| (&candidate.response, candidate.weight))
                .collect();
            if let Some(selected) = pick_item(rng, &eligible) {
                responses.push(to_response(player, selected));
            }
        }
        responses
    }
}

fn is_eligible(map: &MapData, player: PlayerId, response: &ScriptedResponse) -> bool {
    match response {
        ScriptedResponse::CharacterMessage { unit_type, .. } => {
            map.units().values().any(|unit| {
                unit.unit_type() == *unit_type && map.matches_player(unit.player(), player)
            })
        }
        ScriptedResponse::GrantFunds { .. } => true,
        ScriptedResponse::ActivateCrystal => map
            .player(player)
            .is_some_and(|player| player.crystal().is_some()),
    }
}

fn to_response(player: PlayerId, scripted: &ScriptedResponse) -> ActionResponse {
    match scripted {
        ScriptedResponse::CharacterMessage { unit_type, message } => {
            ActionResponse::CharacterMessage {
                player,
                unit_type: *unit_type,
                message: message.clone(),
            }
        }
        ScriptedResponse::GrantFunds { amount } => ActionResponse::ReceiveReward {
            player,
            reward: Reward::Funds { amount: *amount },
        },
        ScriptedResponse::ActivateCrystal => ActionResponse::ActivateCrystal { player },
    }
}

/// Draws one item from a weighted list by cumulative probability.
///
/// Weights are normalized to probabilities summing to one and walked
/// against a single uniform draw. When the list is non-empty but the
/// loop falls through on a floating-point edge, the first candidate is
/// returned deterministically; reimplementations must preserve this
/// fallback so selection can never silently produce nothing.
pub fn pick_item<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [(T, u32)]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let total: u64 = items.iter().map(|(_, weight)| u64::from(*weight)).sum();
    if total == 0 {
        return Some(&items[0].0);
    }

    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (item, weight) in items {
        cumulative += u64::from(*weight) as f64 / total as f64;
        if draw < cumulative {
            return Some(item);
        }
    }
    Some(&items[0].0)
}

#[cfg(test)]
mod tests {
    use super::{
        pick_item, EffectCandidate, EffectCondition, EffectEntry, Effects, ScriptedResponse,
        TriggerKind,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use vanguard_core::{
        unit_info, ActionResponse, PlayerId, SizeVector, TeamId, Vector, INFANTRY, PLAINS, SNIPER,
    };
    use vanguard_world::{MapConfig, MapData, Player, PlayerControl, Team, Unit};

    fn map_with_infantry() -> MapData {
        MapData::create(
            SizeVector::new(4, 4),
            vec![PLAINS; 16],
            vec![(
                Vector::new(1, 1),
                Unit::create(unit_info(INFANTRY).expect("infantry"), PlayerId::new(1)),
            )],
            Vec::new(),
            vec![Team::new(TeamId::new(1), vec![PlayerId::new(1)])],
            vec![Player::new(
                PlayerId::new(1),
                TeamId::new(1),
                0,
                PlayerControl::Human {
                    user: "sam".to_owned(),
                },
            )],
            MapConfig::default(),
            PlayerId::new(1),
            1,
        )
        .expect("valid map")
    }

    #[test]
    fn single_candidate_is_always_selected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..64 {
            let selected = pick_item(&mut rng, &[("only", 3)]);
            assert_eq!(selected, Some(&"only"));
        }
    }

    #[test]
    fn zero_weights_fall_back_to_the_first_candidate() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let selected = pick_item(&mut rng, &[("first", 0), ("second", 0)]);
        assert_eq!(selected, Some(&"first"));
    }

    #[test]
    fn empty_lists_select_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let selected: Option<&&str> = pick_item(&mut rng, &[]);
        assert_eq!(selected, None);
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let items = [("a", 1), ("b", 5), ("c", 2)];
        let picks_a: Vec<&str> = {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            (0..32).map(|_| *pick_item(&mut rng, &items).expect("non-empty")).collect()
        };
        let picks_b: Vec<&str> = {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            (0..32).map(|_| *pick_item(&mut rng, &items).expect("non-empty")).collect()
        };
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn ineligible_messages_are_never_selected() {
        let effects = Effects::new().with_table(
            TriggerKind::GameStart,
            EffectEntry {
                condition: EffectCondition::default(),
                candidates: vec![
                    EffectCandidate {
                        response: ScriptedResponse::CharacterMessage {
                            unit_type: SNIPER,
                            message: "I never deployed.".to_owned(),
                        },
                        weight: 1_000_000,
                    },
                    EffectCandidate {
                        response: ScriptedResponse::GrantFunds { amount: 50 },
                        weight: 1,
                    },
                ],
            },
        );
        let map = map_with_infantry();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..32 {
            let responses = effects.apply(&map, TriggerKind::GameStart, PlayerId::new(1), &mut rng);
            assert_eq!(
                responses,
                vec![ActionResponse::ReceiveReward {
                    player: PlayerId::new(1),
                    reward: vanguard_core::Reward::Funds { amount: 50 },
                }],
                "the sniper line is ineligible: no sniper is fielded",
            );
        }
    }

    #[test]
    fn conditions_narrow_tables_to_players() {
        let effects = Effects::new().with_table(
            TriggerKind::EndTurn,
            EffectEntry {
                condition: EffectCondition {
                    player: Some(PlayerId::new(2)),
                },
                candidates: vec![EffectCandidate {
                    response: ScriptedResponse::GrantFunds { amount: 10 },
                    weight: 1,
                }],
            },
        );
        let map = map_with_infantry();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(effects
            .apply(&map, TriggerKind::EndTurn, PlayerId::new(1), &mut rng)
            .is_empty());
    }

    #[test]
    fn eligible_messages_reference_fielded_units() {
        let effects = Effects::new().with_table(
            TriggerKind::GameStart,
            EffectEntry {
                condition: EffectCondition::default(),
                candidates: vec![EffectCandidate {
                    response: ScriptedResponse::CharacterMessage {
                        unit_type: INFANTRY,
                        message: "Moving out.".to_owned(),
                    },
                    weight: 1,
                }],
            },
        );
        let map = map_with_infantry();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let responses = effects.apply(&map, TriggerKind::GameStart, PlayerId::new(1), &mut rng);
        assert!(matches!(
            responses.as_slice(),
            [ActionResponse::CharacterMessage { unit_type, .. }] if *unit_type == INFANTRY,
        ));
    }

    #[test]
    fn effects_round_trip_through_json() {
        let effects = Effects::new().with_table(
            TriggerKind::GameEnd,
            EffectEntry {
                condition: EffectCondition::default(),
                candidates: vec![EffectCandidate {
                    response: ScriptedResponse::GrantFunds { amount: 500 },
                    weight: 2,
                }],
            },
        );
        let json = serde_json::to_string(&effects).expect("serialize");
        let restored: Effects = serde_json::from_str(&json).expect("parse");
        assert_eq!(restored, effects);
    }
}

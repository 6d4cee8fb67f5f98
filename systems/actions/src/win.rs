//! Win-condition evaluation and end-of-game log surgery.

use vanguard_core::{ActionResponse, PlayerId, TeamId, UnknownTypeError};
use vanguard_world::{query, MapData, WinConditionKind};

use crate::apply::apply_action_response;

/// Evaluates a single configured win condition against the map.
///
/// Returns `None` while the condition is unsatisfied, `Some(winner)`
/// once it triggers; a `Some(None)` marks a draw.
#[must_use]
pub fn evaluate_condition(map: &MapData, index: usize) -> Option<Option<TeamId>> {
    let condition = map.config().win_conditions.get(index)?;
    match condition.kind {
        WinConditionKind::Default => {
            let active = query::active_players(map);
            let mut teams: Vec<TeamId> = active
                .iter()
                .filter_map(|player| map.team_of(*player))
                .collect();
            teams.sort();
            teams.dedup();
            match teams.as_slice() {
                [] => Some(None),
                [winner] => Some(Some(*winner)),
                _ => None,
            }
        }
        WinConditionKind::CaptureAmount { amount } => {
            threshold_winner(map, amount, |statistics| statistics.captured)
        }
        WinConditionKind::DefeatAmount { amount } => {
            threshold_winner(map, amount, |statistics| statistics.destroyed_units)
        }
        WinConditionKind::Survival { rounds } => {
            if map.round() >= rounds {
                Some(map.team_of(map.current_player_id()))
            } else {
                None
            }
        }
    }
}

fn threshold_winner<F>(map: &MapData, amount: u32, counter: F) -> Option<Option<TeamId>>
where
    F: Fn(vanguard_core::PlayerStatistics) -> u32,
{
    map.players()
        .values()
        .find(|player| counter(player.statistics()) >= amount)
        .map(|player| Some(player.team()))
}

/// Evaluates every configured condition after a state-changing action.
///
/// The first satisfied condition produces the end-of-game tail: its
/// reward (granted to the winning team's first player) followed by the
/// [`ActionResponse::GameEnd`] that halts the action chain. A map past
/// its round limit ends in a draw.
#[must_use]
pub fn evaluate_win_conditions(map: &MapData) -> Option<Vec<ActionResponse>> {
    if let Some(limit) = map.config().round_limit {
        if map.round() > limit {
            return Some(vec![ActionResponse::GameEnd {
                winning_team: None,
                condition: None,
            }]);
        }
    }

    for index in 0..map.config().win_conditions.len() {
        let Some(winner) = evaluate_condition(map, index) else {
            continue;
        };
        let mut responses = Vec::new();
        let condition = &map.config().win_conditions[index];
        if let (Some(reward), Some(team)) = (condition.reward, winner) {
            if let Some(recipient) = first_member(map, team) {
                responses.push(ActionResponse::ReceiveReward {
                    player: recipient,
                    reward,
                });
            }
        }
        responses.push(ActionResponse::GameEnd {
            winning_team: winner,
            condition: Some(index),
        });
        return Some(responses);
    }
    None
}

fn first_member(map: &MapData, team: TeamId) -> Option<PlayerId> {
    map.players()
        .values()
        .find(|player| player.team() == team)
        .map(vanguard_world::Player::id)
}

/// Reworks a log whose trailing entry is a [`ActionResponse::GameEnd`].
///
/// The evaluating viewer is re-rooted with a `SetViewer` marker, the
/// effect-triggered sub-sequence follows it, and a hidden objective
/// prepends `SecretDiscovered`. The sub-sequence is spliced in
/// immediately before the longest trailing run of `ReceiveReward`
/// entries, not appended, and the original `GameEnd` is re-appended
/// recomputed against the final map. Returns the reworked log and the
/// map after the spliced responses.
pub fn on_game_end(
    map: &MapData,
    responses: Vec<ActionResponse>,
    viewer: PlayerId,
    effect_responses: Vec<ActionResponse>,
) -> Result<(Vec<ActionResponse>, MapData), UnknownTypeError> {
    let mut responses = responses;
    let Some(ActionResponse::GameEnd {
        winning_team,
        condition,
    }) = responses.last().cloned()
    else {
        return Ok((responses, map.clone()));
    };
    let _ = responses.pop();

    let mut spliced = vec![ActionResponse::SetViewer { player: viewer }];
    if let Some(index) = condition {
        let hidden = map
            .config()
            .win_conditions
            .get(index)
            .is_some_and(|condition| condition.hidden);
        if hidden {
            spliced.push(ActionResponse::SecretDiscovered { condition: index });
        }
    }
    spliced.extend(effect_responses);

    let mut final_map = map.clone();
    for response in &spliced {
        final_map = apply_action_response(&final_map, response)?;
    }

    // First index from the tail whose entry is not a ReceiveReward: the
    // sub-sequence lands there so trailing rewards stay trailing.
    let mut insert_at = responses.len();
    while insert_at > 0
        && matches!(responses[insert_at - 1], ActionResponse::ReceiveReward { .. })
    {
        insert_at -= 1;
    }
    let tail: Vec<ActionResponse> = responses.split_off(insert_at);
    responses.extend(spliced);
    responses.extend(tail);

    let recomputed = condition
        .and_then(|index| evaluate_condition(&final_map, index))
        .unwrap_or(winning_team);
    responses.push(ActionResponse::GameEnd {
        winning_team: recomputed,
        condition,
    });

    Ok((responses, final_map))
}

#[cfg(test)]
mod tests {
    use super::on_game_end;
    use vanguard_core::{
        unit_info, ActionResponse, PlayerId, Reward, SizeVector, TeamId, Vector, INFANTRY, PLAINS,
    };
    use vanguard_world::{
        MapConfig, MapData, Player, PlayerControl, Team, Unit, WinCondition, WinConditionKind,
    };

    fn ended_map(hidden: bool) -> MapData {
        MapData::create(
            SizeVector::new(4, 4),
            vec![PLAINS; 16],
            vec![(
                Vector::new(1, 1),
                Unit::create(unit_info(INFANTRY).expect("infantry"), PlayerId::new(1)),
            )],
            Vec::new(),
            vec![
                Team::new(TeamId::new(1), vec![PlayerId::new(1)]),
                Team::new(TeamId::new(2), vec![PlayerId::new(2)]),
            ],
            vec![
                Player::new(
                    PlayerId::new(1),
                    TeamId::new(1),
                    100,
                    PlayerControl::Human {
                        user: "a".to_owned(),
                    },
                ),
                Player::new(
                    PlayerId::new(2),
                    TeamId::new(2),
                    100,
                    PlayerControl::Human {
                        user: "b".to_owned(),
                    },
                ),
            ],
            MapConfig {
                win_conditions: vec![WinCondition {
                    kind: WinConditionKind::Default,
                    hidden,
                    reward: None,
                }],
                ..MapConfig::default()
            },
            PlayerId::new(1),
            1,
        )
        .expect("valid map")
    }

    fn game_end() -> ActionResponse {
        ActionResponse::GameEnd {
            winning_team: Some(TeamId::new(1)),
            condition: Some(0),
        }
    }

    fn reward(player: u8) -> ActionResponse {
        ActionResponse::ReceiveReward {
            player: PlayerId::new(player),
            reward: Reward::Funds { amount: 10 },
        }
    }

    #[test]
    fn splice_lands_before_trailing_rewards() {
        let map = ended_map(false);
        let log = vec![
            ActionResponse::CompleteUnit {
                at: Vector::new(1, 1),
            },
            reward(1),
            reward(1),
            game_end(),
        ];
        let (spliced, _) = on_game_end(&map, log, PlayerId::new(2), Vec::new())
            .expect("splice applies");

        assert!(matches!(spliced[0], ActionResponse::CompleteUnit { .. }));
        assert!(
            matches!(spliced[1], ActionResponse::SetViewer { player } if player.get() == 2),
            "the viewer marker lands before the trailing rewards",
        );
        assert!(matches!(spliced[2], ActionResponse::ReceiveReward { .. }));
        assert!(matches!(spliced[3], ActionResponse::ReceiveReward { .. }));
        assert!(matches!(spliced[4], ActionResponse::GameEnd { .. }));
    }

    #[test]
    fn hidden_objectives_are_revealed_first() {
        let map = ended_map(true);
        let effect = ActionResponse::CharacterMessage {
            player: PlayerId::new(1),
            unit_type: INFANTRY,
            message: "A hidden path!".to_owned(),
        };
        let (spliced, _) =
            on_game_end(&map, vec![game_end()], PlayerId::new(1), vec![effect.clone()])
                .expect("splice applies");

        assert!(matches!(spliced[0], ActionResponse::SetViewer { .. }));
        assert!(matches!(
            spliced[1],
            ActionResponse::SecretDiscovered { condition: 0 },
        ));
        assert_eq!(spliced[2], effect);
        assert!(matches!(spliced[3], ActionResponse::GameEnd { .. }));
    }

    #[test]
    fn logs_without_a_trailing_game_end_pass_through() {
        let map = ended_map(false);
        let log = vec![reward(1)];
        let (unchanged, final_map) =
            on_game_end(&map, log.clone(), PlayerId::new(1), Vec::new()).expect("no-op");
        assert_eq!(unchanged, log);
        assert_eq!(final_map, map);
    }
}

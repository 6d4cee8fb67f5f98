#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The AI decision engine.
//!
//! Each invocation produces exactly one [`Action`] for the acting
//! player; the surrounding turn loop calls again until the engine elects
//! to end the turn. Candidates are enumerated through the same legality
//! functions the action layer enforces, scored by a swappable evaluator
//! looked up in a registry, and tied candidates resolve by generation
//! order so identical inputs always produce identical decisions.

use std::collections::BTreeMap;

use vanguard_core::{
    building_info, unit_info, Action, ActionResponse, PlayerId, UnknownTypeError, Vector,
};
use vanguard_system_actions::{movable_area, resolve, Resolution};
use vanguard_world::{query, MapData, PlayerControl, Vision};

/// Strategy key used when a computer seat names no other evaluator.
pub const DEFAULT_STRATEGY: &str = "balanced";

/// Scores the outcome of a candidate action for the acting player.
pub trait Evaluator {
    /// Higher is better; ties keep the earlier candidate.
    fn score(&self, before: &MapData, player: PlayerId, resolution: &Resolution) -> i64;
}

/// Registry mapping strategy keys to evaluators, so campaigns can swap
/// difficulty without touching the resolution pipeline.
pub struct AiRegistry {
    evaluators: BTreeMap<String, Box<dyn Evaluator>>,
}

impl AiRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            evaluators: BTreeMap::new(),
        }
    }

    /// Registers an evaluator under a strategy key, replacing any
    /// previous holder of the key.
    #[must_use]
    pub fn with(mut self, key: &str, evaluator: Box<dyn Evaluator>) -> Self {
        let _ = self.evaluators.insert(key.to_owned(), evaluator);
        self
    }

    /// Looks up an evaluator, falling back to the default strategy.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn Evaluator> {
        self.evaluators
            .get(key)
            .or_else(|| self.evaluators.get(DEFAULT_STRATEGY))
            .map(Box::as_ref)
    }
}

impl Default for AiRegistry {
    fn default() -> Self {
        Self::new().with(DEFAULT_STRATEGY, Box::new(BalancedEvaluator))
    }
}

/// Default evaluator weighing material, economy, position, and victory.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalancedEvaluator;

impl Evaluator for BalancedEvaluator {
    fn score(&self, _before: &MapData, player: PlayerId, resolution: &Resolution) -> i64 {
        let map = &resolution.map;
        let mut score = 0i64;

        for unit in map.units().values() {
            let value = unit_info(unit.unit_type())
                .map(|info| i64::from(info.cost))
                .unwrap_or(0)
                * i64::from(unit.health())
                / 100;
            if map.matches_player(unit.player(), player) {
                score += value;
            } else if map.is_opponent(unit.player(), player) {
                score -= value;
            }
        }

        for building in map.buildings().values() {
            let income = building_info(building.building_type())
                .map(|info| i64::from(info.funds))
                .unwrap_or(0);
            if map.matches_player(building.player(), player) {
                score += 50 + income;
            } else if map.is_opponent(building.player(), player) {
                score -= 50 + income;
            }
        }

        score += map
            .player(player)
            .map(|player| i64::from(player.funds()) / 10)
            .unwrap_or(0);

        // Pull idle units toward the closest hostile or claimable target.
        let targets = hostile_targets(map, player);
        if !targets.is_empty() {
            for position in query::unit_positions(map, player) {
                let closest = targets
                    .iter()
                    .map(|target| i64::from(position.distance(*target)))
                    .min()
                    .unwrap_or(0);
                score -= closest;
            }
        }

        // Mid-capture units are one action from converting a building.
        for (vector, unit) in map.units() {
            if map.matches_player(unit.player(), player)
                && unit.is_capturing()
                && map.building(*vector).is_some()
            {
                score += 120;
            }
        }

        for response in &resolution.responses {
            if let ActionResponse::GameEnd { winning_team, .. } = response {
                score += match winning_team {
                    Some(team) if map.team_of(player) == Some(*team) => 1_000_000,
                    Some(_) => -1_000_000,
                    None => 0,
                };
            }
        }

        score
    }
}

fn hostile_targets(map: &MapData, player: PlayerId) -> Vec<Vector> {
    let mut targets: Vec<Vector> = map
        .units()
        .iter()
        .filter(|(_, unit)| map.is_opponent(unit.player(), player))
        .map(|(vector, _)| *vector)
        .collect();
    targets.extend(
        map.buildings()
            .iter()
            .filter(|(_, building)| !map.matches_team(building.player(), player))
            .map(|(vector, _)| *vector),
    );
    targets
}

/// Chooses the next action for the acting (computer) player.
///
/// Exactly one action per invocation. The turn always terminates: every
/// candidate either completes a unit or spends a bounded resource, and
/// `EndTurn` is selected whenever no candidate beats the stand-pat
/// baseline.
pub fn next_action(map: &MapData, registry: &AiRegistry) -> Result<Action, UnknownTypeError> {
    let player = map.current_player_id();
    let strategy = match map.current_player().control() {
        PlayerControl::Computer { strategy } => strategy.clone(),
        PlayerControl::Human { .. } => DEFAULT_STRATEGY.to_owned(),
    };
    let Some(evaluator) = registry.get(&strategy) else {
        return Ok(Action::EndTurn);
    };

    let vision = Vision::compute(map, player);
    let baseline = resolve(map, &vision, &Action::EndTurn)?
        .map(|resolution| evaluator.score(map, player, &resolution))
        .unwrap_or(i64::MIN);

    let mut best: Option<(i64, Action)> = None;
    for action in generate_candidates(map, player) {
        let Some(resolution) = resolve(map, &vision, &action)? else {
            continue;
        };
        let score = evaluator.score(map, player, &resolution);
        let improves = match &best {
            None => score > baseline,
            Some((best_score, _)) => score > *best_score,
        };
        if improves {
            best = Some((score, action));
        }
    }

    Ok(best.map(|(_, action)| action).unwrap_or(Action::EndTurn))
}

/// Enumerates candidate actions in a fixed, deterministic order: for
/// every orderable unit its attacks, captures, constructions, drops,
/// and moves; then production per owned building; then powers.
#[must_use]
pub fn generate_candidates(map: &MapData, player: PlayerId) -> Vec<Action> {
    let mut candidates = Vec::new();

    for (position, unit) in map.units() {
        if !map.matches_player(unit.player(), player) || unit.is_completed() {
            continue;
        }
        let Some(info) = unit_info(unit.unit_type()) else {
            continue;
        };

        let max_range = info
            .weapons
            .iter()
            .map(|weapon| weapon.range.1)
            .max()
            .unwrap_or(0);
        for target in position.expand_star(max_range) {
            if target == *position || !target.within(map.size()) {
                continue;
            }
            if map.unit(target).is_some() {
                candidates.push(Action::AttackUnit {
                    from: *position,
                    to: target,
                });
            }
            if map.building(target).is_some() && map.unit(target).is_none() {
                candidates.push(Action::AttackBuilding {
                    from: *position,
                    to: target,
                });
            }
        }

        if info.can_capture && map.building(*position).is_some() {
            candidates.push(Action::Capture { at: *position });
        }
        if info.can_build {
            for building_type in [
                vanguard_core::HOUSE,
                vanguard_core::BARRACKS,
                vanguard_core::FACTORY,
            ] {
                candidates.push(Action::CreateBuilding {
                    at: *position,
                    building_type,
                });
            }
        }
        for index in 0..unit.transports().len() {
            for target in position.adjacent() {
                candidates.push(Action::DropUnit {
                    from: *position,
                    index,
                    to: target,
                });
            }
        }
        if let Some(area) = movable_area(map, *position) {
            for destination in area.reachable() {
                candidates.push(Action::Move {
                    from: *position,
                    to: destination,
                });
            }
        }
    }

    for (position, building) in map.buildings() {
        if !map.matches_player(building.player(), player) {
            continue;
        }
        let Some(info) = building_info(building.building_type()) else {
            continue;
        };
        for unit_type in info.units {
            candidates.push(Action::CreateUnit {
                at: *position,
                unit_type: *unit_type,
            });
        }
    }

    if let Some(acting) = map.player(player) {
        for skill in acting.skills() {
            candidates.push(Action::ActivatePower { skill: *skill });
        }
        if acting.crystal().is_some() {
            candidates.push(Action::ActivateCrystal);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::{next_action, AiRegistry, Evaluator};
    use vanguard_core::{
        unit_info, Action, PlayerId, SizeVector, TeamId, Vector, BARRACKS, HOUSE, HQ, INFANTRY,
        PLAINS, TANK,
    };
    use vanguard_system_actions::{apply_action_response, resolve, Resolution};
    use vanguard_world::{
        Building, MapConfig, MapData, Player, PlayerControl, Team, Unit, Vision,
    };

    fn computer(id: u8, funds: u32) -> Player {
        Player::new(
            PlayerId::new(id),
            TeamId::new(id),
            funds,
            PlayerControl::Computer {
                strategy: "balanced".to_owned(),
            },
        )
    }

    fn skirmish(units: Vec<(Vector, Unit)>, buildings: Vec<(Vector, Building)>) -> MapData {
        MapData::create(
            SizeVector::new(8, 8),
            vec![PLAINS; 64],
            units,
            buildings,
            vec![
                Team::new(TeamId::new(1), vec![PlayerId::new(1)]),
                Team::new(TeamId::new(2), vec![PlayerId::new(2)]),
            ],
            vec![computer(1, 1000), computer(2, 1000)],
            MapConfig::default(),
            PlayerId::new(1),
            1,
        )
        .expect("valid map")
    }

    fn unit_of(type_id: vanguard_core::UnitTypeId, owner: u8) -> Unit {
        Unit::create(unit_info(type_id).expect("known type"), PlayerId::new(owner))
    }

    #[test]
    fn prefers_a_winning_attack() {
        let map = skirmish(
            vec![
                (Vector::new(2, 2), unit_of(TANK, 1)),
                (Vector::new(2, 3), unit_of(INFANTRY, 2).damaged(70)),
                (Vector::new(8, 8), unit_of(INFANTRY, 2)),
            ],
            Vec::new(),
        );
        let action = next_action(&map, &AiRegistry::default()).expect("no fatal error");
        assert_eq!(
            action,
            Action::AttackUnit {
                from: Vector::new(2, 2),
                to: Vector::new(2, 3),
            },
        );
    }

    #[test]
    fn decisions_are_deterministic() {
        let map = skirmish(
            vec![
                (Vector::new(2, 2), unit_of(TANK, 1)),
                (Vector::new(6, 6), unit_of(TANK, 2)),
            ],
            vec![(Vector::new(1, 1), Building::create(HOUSE, PlayerId::NEUTRAL))],
        );
        let registry = AiRegistry::default();
        let first = next_action(&map, &registry).expect("no fatal error");
        let second = next_action(&map, &registry).expect("no fatal error");
        assert_eq!(first, second);
    }

    #[test]
    fn ends_the_turn_when_nothing_improves() {
        let map = skirmish(
            vec![(Vector::new(1, 1), unit_of(INFANTRY, 1).complete())],
            vec![
                (Vector::new(1, 1), Building::create(HQ, PlayerId::new(1))),
                (Vector::new(8, 8), Building::create(HQ, PlayerId::new(2))),
            ],
        );
        let action = next_action(&map, &AiRegistry::default()).expect("no fatal error");
        assert_eq!(action, Action::EndTurn);
    }

    #[test]
    fn every_turn_terminates() {
        let mut map = skirmish(
            vec![
                (Vector::new(2, 2), unit_of(INFANTRY, 1)),
                (Vector::new(3, 2), unit_of(TANK, 1)),
                (Vector::new(7, 7), unit_of(TANK, 2)),
            ],
            vec![(Vector::new(2, 1), Building::create(BARRACKS, PlayerId::new(1)))],
        );
        let registry = AiRegistry::default();
        let mut decisions = 0;
        loop {
            let action = next_action(&map, &registry).expect("no fatal error");
            decisions += 1;
            assert!(decisions < 64, "the AI must end its turn");
            let vision = Vision::compute(&map, map.current_player_id());
            let Some(resolution) = resolve(&map, &vision, &action).expect("no fatal error") else {
                panic!("the AI proposed an illegal action: {action:?}");
            };
            if matches!(action, Action::EndTurn) {
                break;
            }
            map = resolution.map;
        }
    }

    #[test]
    fn custom_evaluators_override_the_default() {
        struct Pacifist;
        impl Evaluator for Pacifist {
            fn score(&self, _before: &MapData, _player: PlayerId, resolution: &Resolution) -> i64 {
                // Penalize any aggression so only EndTurn survives.
                -(resolution.responses.len() as i64)
            }
        }

        let map = skirmish(
            vec![
                (Vector::new(2, 2), unit_of(TANK, 1)),
                (Vector::new(2, 3), unit_of(INFANTRY, 2).damaged(70)),
            ],
            Vec::new(),
        );
        let registry = AiRegistry::new().with("balanced", Box::new(Pacifist));
        let action = next_action(&map, &registry).expect("no fatal error");
        assert_eq!(action, Action::EndTurn);
    }

    #[test]
    fn proposed_actions_always_resolve() {
        let map = skirmish(
            vec![
                (Vector::new(2, 2), unit_of(TANK, 1)),
                (Vector::new(5, 5), unit_of(INFANTRY, 2)),
            ],
            vec![(Vector::new(3, 3), Building::create(BARRACKS, PlayerId::new(1)))],
        );
        let action = next_action(&map, &AiRegistry::default()).expect("no fatal error");
        let vision = Vision::compute(&map, map.current_player_id());
        let resolution = resolve(&map, &vision, &action).expect("no fatal error");
        assert!(resolution.is_some(), "AI actions obey the rule set");
        if let Some(resolution) = resolution {
            // Replaying the emitted responses reproduces the same map.
            let mut replayed = map.clone();
            for response in &resolution.responses {
                replayed =
                    apply_action_response(&replayed, response).expect("responses apply cleanly");
            }
            assert_eq!(replayed, resolution.map);
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure action-resolution pipeline.
//!
//! [`resolve`] maps `(MapData, Vision, Action)` to an ordered sequence of
//! [`ActionResponse`] values plus the resulting map. Rule violations are
//! rejected silently with `Ok(None)`; only programmer and data errors
//! surface as [`UnknownTypeError`]. The resulting map is always derived
//! by folding the emitted responses through the same interpreter used by
//! replays, so live play and replay cannot diverge.

mod apply;
mod movement;
mod teleport;
mod win;

pub use apply::{
    apply_action_response, select_weapon, BUILDING_HEAL, CRYSTAL_CHARGE, FIELD_REPAIRS_HEAL,
    WAR_BONDS_PAYOUT,
};
pub use movement::{movable_area, MovementMap};
pub use teleport::teleport_target;
pub use win::{evaluate_condition, evaluate_win_conditions, on_game_end};

use vanguard_core::{
    building_info_or_unknown, skill_info_or_unknown, unit_info_or_unknown, Action, ActionResponse,
    BuildingTypeId, SkillId, UnitTypeId, UnknownTypeError, Vector, WeaponInfo,
};
use vanguard_world::{
    deterministic_unit_name, follower_name, leader_name, leaders, MapData, Vision,
};

/// Flat damage reduction applied when a building defends.
const BUILDING_DEFENSE: u16 = 20;

/// Result of successfully resolving an action.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// The resolved transitions in rule-determined order.
    pub responses: Vec<ActionResponse>,
    /// The map after applying every response in order.
    pub map: MapData,
}

/// Resolves a player intent against the current map and the acting
/// player's vision.
///
/// Returns `Ok(None)` when the action violates a rule; the caller must
/// treat that as a legitimate, silent rejection.
pub fn resolve(
    map: &MapData,
    vision: &Vision,
    action: &Action,
) -> Result<Option<Resolution>, UnknownTypeError> {
    let responses = match action {
        Action::Start => Some(vec![ActionResponse::Start]),
        Action::Move { from, to } => resolve_move(map, *from, *to)?,
        Action::DropUnit { from, index, to } => resolve_drop(map, *from, *index, *to)?,
        Action::AttackUnit { from, to } => resolve_attack_unit(map, vision, *from, *to)?,
        Action::AttackBuilding { from, to } => resolve_attack_building(map, vision, *from, *to)?,
        Action::Capture { at } => resolve_capture(map, *at)?,
        Action::CreateUnit { at, unit_type } => resolve_create_unit(map, *at, *unit_type)?,
        Action::CreateBuilding { at, building_type } => {
            resolve_create_building(map, *at, *building_type)?
        }
        Action::ActivatePower { skill } => resolve_power(map, *skill)?,
        Action::ActivateCrystal => resolve_crystal(map),
        Action::CompleteUnit { at } => resolve_complete(map, *at),
        Action::EndTurn => Some(resolve_end_turn(map)),
    };
    let Some(mut responses) = responses else {
        return Ok(None);
    };

    let mut next = map.clone();
    for response in &responses {
        next = apply_action_response(&next, response)?;
    }

    if !matches!(action, Action::Start) {
        if let Some(tail) = evaluate_win_conditions(&next) {
            for response in &tail {
                next = apply_action_response(&next, response)?;
            }
            responses.extend(tail);
        }
    }

    Ok(Some(Resolution {
        responses,
        map: next,
    }))
}

fn resolve_move(
    map: &MapData,
    from: Vector,
    to: Vector,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    if from == to || !to.within(map.size()) {
        return Ok(None);
    }
    let Some(unit) = map.unit(from) else {
        return Ok(None);
    };
    if !map.matches_player(unit.player(), map.current_player_id()) || unit.is_completed() {
        return Ok(None);
    }
    let info = unit_info_or_unknown(unit.unit_type(), "resolve_move")?;

    let Some(area) = movable_area(map, from) else {
        return Ok(None);
    };
    let Some(cost) = area.cost(to) else {
        return Ok(None);
    };
    let Some(mut path) = area.path(to) else {
        return Ok(None);
    };

    let loaded = match map.unit(to) {
        None => false,
        Some(occupant) => {
            let carrier = unit_info_or_unknown(occupant.unit_type(), "resolve_move")?;
            let can_load = map.matches_player(occupant.player(), unit.player())
                && carrier.is_transport()
                && !occupant.is_full(carrier)
                && !info.is_transport();
            if !can_load {
                return Ok(None);
            }
            true
        }
    };

    let mut destination = to;
    if !loaded {
        if let Some(exit) = teleport_target(map, to, unit.player()) {
            destination = exit;
            path.push(exit);
        }
    }

    let fuel = unit.fuel().saturating_sub(cost as u16);
    Ok(Some(vec![ActionResponse::Move {
        from,
        to: destination,
        path,
        fuel,
        loaded,
    }]))
}

fn resolve_drop(
    map: &MapData,
    from: Vector,
    index: usize,
    to: Vector,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    let Some(transport) = map.unit(from) else {
        return Ok(None);
    };
    if !map.matches_player(transport.player(), map.current_player_id())
        || transport.is_completed()
        || index >= transport.transports().len()
    {
        return Ok(None);
    }
    let _ = unit_info_or_unknown(transport.unit_type(), "resolve_drop")?;
    if from.distance(to) != 1 || !to.within(map.size()) || map.unit(to).is_some() {
        return Ok(None);
    }
    let passable = map
        .tile_info_at(to)
        .is_some_and(|tile| tile.movement_cost.is_some());
    if !passable {
        return Ok(None);
    }
    Ok(Some(vec![ActionResponse::DropUnit { from, index, to }]))
}

fn resolve_attack_unit(
    map: &MapData,
    vision: &Vision,
    from: Vector,
    to: Vector,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    let (Some(attacker), Some(defender)) = (map.unit(from), map.unit(to)) else {
        return Ok(None);
    };
    if !map.matches_player(attacker.player(), map.current_player_id())
        || attacker.is_completed()
        || !map.is_opponent(attacker.player(), defender.player())
        || !vision.is_visible(to)
    {
        return Ok(None);
    }

    let attacker_info = unit_info_or_unknown(attacker.unit_type(), "resolve_attack_unit")?;
    let defender_info = unit_info_or_unknown(defender.unit_type(), "resolve_attack_unit")?;
    let distance = from.distance(to);
    let Some(weapon) = select_weapon(attacker, attacker_info.weapons, distance) else {
        return Ok(None);
    };

    let defender_cover = map.tile_info_at(to).map(|tile| tile.cover).unwrap_or(0);
    let damage = battle_damage(
        weapon,
        attacker.health(),
        defender_info.defense,
        defender_cover,
    );

    let mut responses = Vec::new();
    let defender_survives = defender.health() > damage;
    let counter_damage = if defender_survives && distance == 1 {
        select_weapon(defender, defender_info.weapons, distance).map(|counter_weapon| {
            let attacker_cover = map.tile_info_at(from).map(|tile| tile.cover).unwrap_or(0);
            battle_damage(
                counter_weapon,
                defender.health() - damage,
                attacker_info.defense,
                attacker_cover,
            )
        })
    } else {
        None
    };

    responses.push(ActionResponse::AttackUnit {
        from,
        to,
        damage,
        counter_damage,
    });
    if !defender_survives {
        responses.push(ActionResponse::UnitDestroyed {
            at: to,
            player: defender.player(),
        });
    }
    if let Some(counter) = counter_damage {
        if attacker.health() <= counter {
            responses.push(ActionResponse::UnitDestroyed {
                at: from,
                player: attacker.player(),
            });
        }
    }
    Ok(Some(responses))
}

fn resolve_attack_building(
    map: &MapData,
    vision: &Vision,
    from: Vector,
    to: Vector,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    let (Some(attacker), Some(building)) = (map.unit(from), map.building(to)) else {
        return Ok(None);
    };
    if !map.matches_player(attacker.player(), map.current_player_id())
        || attacker.is_completed()
        || map.matches_team(attacker.player(), building.player())
        || !vision.is_visible(to)
        || map.unit(to).is_some()
    {
        return Ok(None);
    }

    let attacker_info = unit_info_or_unknown(attacker.unit_type(), "resolve_attack_building")?;
    let distance = from.distance(to);
    let Some(weapon) = select_weapon(attacker, attacker_info.weapons, distance) else {
        return Ok(None);
    };

    let cover = map.tile_info_at(to).map(|tile| tile.cover).unwrap_or(0);
    let damage = battle_damage(weapon, attacker.health(), BUILDING_DEFENSE, cover);

    let mut responses = vec![ActionResponse::AttackBuilding { from, to, damage }];
    if building.health() <= damage {
        responses.push(ActionResponse::BuildingDestroyed {
            at: to,
            player: building.player(),
        });
    }
    Ok(Some(responses))
}

fn resolve_capture(
    map: &MapData,
    at: Vector,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    let (Some(unit), Some(building)) = (map.unit(at), map.building(at)) else {
        return Ok(None);
    };
    if !map.matches_player(unit.player(), map.current_player_id())
        || unit.is_completed()
        || map.matches_team(unit.player(), building.player())
    {
        return Ok(None);
    }
    let info = unit_info_or_unknown(unit.unit_type(), "resolve_capture")?;
    if !info.can_capture {
        return Ok(None);
    }

    if unit.is_capturing() {
        Ok(Some(vec![ActionResponse::CaptureBuilding {
            at,
            player: unit.player(),
        }]))
    } else {
        Ok(Some(vec![ActionResponse::CaptureStarted {
            at,
            player: unit.player(),
        }]))
    }
}

fn resolve_create_unit(
    map: &MapData,
    at: Vector,
    unit_type: UnitTypeId,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    let Some(building) = map.building(at) else {
        return Ok(None);
    };
    let player = map.current_player_id();
    if !map.matches_player(building.player(), player) || map.unit(at).is_some() {
        return Ok(None);
    }
    let building_info = building_info_or_unknown(building.building_type(), "resolve_create_unit")?;
    if !building_info.units.contains(&unit_type) {
        return Ok(None);
    }
    let info = unit_info_or_unknown(unit_type, "resolve_create_unit")?;
    let funds = map
        .player(player)
        .map(vanguard_world::Player::funds)
        .unwrap_or(0);
    if funds < info.cost {
        return Ok(None);
    }

    let index = deterministic_unit_name(map, at, player, info, 0) as usize;
    let has_leader = leaders(map)
        .get(&player)
        .is_some_and(|types| types.contains(&unit_type));
    let name = if has_leader {
        follower_name(index)
    } else {
        leader_name(index)
    };

    Ok(Some(vec![ActionResponse::CreateUnit {
        at,
        unit_type,
        player,
        name: Some(name),
        free: false,
    }]))
}

fn resolve_create_building(
    map: &MapData,
    at: Vector,
    building_type: BuildingTypeId,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    let Some(unit) = map.unit(at) else {
        return Ok(None);
    };
    if !map.matches_player(unit.player(), map.current_player_id())
        || unit.is_completed()
        || map.building(at).is_some()
    {
        return Ok(None);
    }
    let info = unit_info_or_unknown(unit.unit_type(), "resolve_create_building")?;
    if !info.can_build {
        return Ok(None);
    }
    let buildable = map
        .tile_info_at(at)
        .is_some_and(|tile| tile.can_build_on);
    if !buildable {
        return Ok(None);
    }
    let building_info = building_info_or_unknown(building_type, "resolve_create_building")?;
    let Some(cost) = building_info.cost else {
        return Ok(None);
    };
    let funds = map
        .player(unit.player())
        .map(vanguard_world::Player::funds)
        .unwrap_or(0);
    if funds < cost {
        return Ok(None);
    }

    Ok(Some(vec![ActionResponse::CreateBuilding {
        at,
        building_type,
    }]))
}

fn resolve_power(
    map: &MapData,
    skill: SkillId,
) -> Result<Option<Vec<ActionResponse>>, UnknownTypeError> {
    let info = skill_info_or_unknown(skill, "resolve_power")?;
    let player = map.current_player();
    if !player.skills().contains(&skill)
        || player.charge() < info.charge_cost
        || (info.requires_crystal && player.crystal().is_none())
    {
        return Ok(None);
    }
    Ok(Some(vec![ActionResponse::ActivatePower {
        player: player.id(),
        skill,
    }]))
}

fn resolve_crystal(map: &MapData) -> Option<Vec<ActionResponse>> {
    let player = map.current_player();
    let _ = player.crystal()?;
    Some(vec![ActionResponse::ActivateCrystal {
        player: player.id(),
    }])
}

fn resolve_complete(map: &MapData, at: Vector) -> Option<Vec<ActionResponse>> {
    if !vanguard_world::query::is_orderable(map, at, map.current_player_id()) {
        return None;
    }
    Some(vec![ActionResponse::CompleteUnit { at }])
}

fn resolve_end_turn(map: &MapData) -> Vec<ActionResponse> {
    let previous = map.current_player_id();
    let next = map.next_player();
    let round = if next <= previous {
        map.round() + 1
    } else {
        map.round()
    };
    vec![ActionResponse::EndTurn {
        previous,
        next,
        round,
    }]
}

fn battle_damage(weapon: &WeaponInfo, attacker_health: u16, defense: u16, cover: u16) -> u16 {
    let scaled = u32::from(weapon.damage) * u32::from(attacker_health) / 100;
    let reduced = scaled * 100 / (100 + u32::from(defense) + u32::from(cover));
    reduced.max(1) as u16
}

#[cfg(test)]
mod tests {
    use super::{resolve, Resolution};
    use vanguard_core::{
        unit_info, Action, ActionResponse, PlayerId, SizeVector, TeamId, Vector, ARTILLERY,
        BARRACKS, FACTORY, HOUSE, HQ, INFANTRY, JEEP, PIONEER, PLAINS, SNIPER, TANK,
    };
    use vanguard_world::{
        Building, MapConfig, MapData, Player, PlayerControl, Team, Unit, Vision, WinCondition,
        WinConditionKind,
    };

    fn player(id: u8, team: u8, funds: u32) -> Player {
        Player::new(
            PlayerId::new(id),
            TeamId::new(team),
            funds,
            PlayerControl::Human {
                user: format!("user-{id}"),
            },
        )
    }

    fn base_map(units: Vec<(Vector, Unit)>, buildings: Vec<(Vector, Building)>) -> MapData {
        MapData::create(
            SizeVector::new(8, 8),
            vec![PLAINS; 64],
            units,
            buildings,
            vec![
                Team::new(TeamId::new(1), vec![PlayerId::new(1)]),
                Team::new(TeamId::new(2), vec![PlayerId::new(2)]),
            ],
            vec![player(1, 1, 2000), player(2, 2, 2000)],
            MapConfig::default(),
            PlayerId::new(1),
            1,
        )
        .expect("valid map")
    }

    fn unit_of(type_id: vanguard_core::UnitTypeId, owner: u8) -> Unit {
        Unit::create(unit_info(type_id).expect("known type"), PlayerId::new(owner))
    }

    fn resolve_ok(map: &MapData, action: Action) -> Option<Resolution> {
        let vision = Vision::compute(map, map.current_player_id());
        resolve(map, &vision, &action).expect("no fatal error")
    }

    #[test]
    fn move_spends_fuel_and_completes() {
        let map = base_map(vec![(Vector::new(2, 2), unit_of(INFANTRY, 1))], Vec::new());
        let resolution = resolve_ok(
            &map,
            Action::Move {
                from: Vector::new(2, 2),
                to: Vector::new(4, 2),
            },
        )
        .expect("legal move");

        match &resolution.responses[0] {
            ActionResponse::Move { path, fuel, .. } => {
                assert_eq!(path, &vec![Vector::new(3, 2), Vector::new(4, 2)]);
                assert_eq!(*fuel, 48);
            }
            other => panic!("expected Move, got {other:?}"),
        }
        let moved = resolution.map.unit(Vector::new(4, 2)).expect("unit moved");
        assert!(moved.is_completed());
        assert!(resolution.map.unit(Vector::new(2, 2)).is_none());
    }

    #[test]
    fn move_rejects_out_of_range_and_foreign_units() {
        let map = base_map(
            vec![
                (Vector::new(2, 2), unit_of(INFANTRY, 1)),
                (Vector::new(7, 7), unit_of(INFANTRY, 2)),
            ],
            Vec::new(),
        );
        assert!(resolve_ok(
            &map,
            Action::Move {
                from: Vector::new(2, 2),
                to: Vector::new(8, 2),
            },
        )
        .is_none());
        assert!(resolve_ok(
            &map,
            Action::Move {
                from: Vector::new(7, 7),
                to: Vector::new(6, 7),
            },
        )
        .is_none());
    }

    #[test]
    fn moving_onto_a_transport_loads() {
        let map = base_map(
            vec![
                (Vector::new(2, 2), unit_of(INFANTRY, 1)),
                (Vector::new(3, 2), unit_of(JEEP, 1)),
            ],
            Vec::new(),
        );
        let resolution = resolve_ok(
            &map,
            Action::Move {
                from: Vector::new(2, 2),
                to: Vector::new(3, 2),
            },
        )
        .expect("legal load");
        let jeep = resolution.map.unit(Vector::new(3, 2)).expect("jeep stays");
        assert_eq!(jeep.transports().len(), 1);
        assert!(resolution.map.unit(Vector::new(2, 2)).is_none());
    }

    #[test]
    fn drop_unloads_onto_adjacent_field() {
        let jeep = unit_of(JEEP, 1).load(unit_of(INFANTRY, 1).into_transported());
        let map = base_map(vec![(Vector::new(3, 3), jeep)], Vec::new());
        let resolution = resolve_ok(
            &map,
            Action::DropUnit {
                from: Vector::new(3, 3),
                index: 0,
                to: Vector::new(3, 4),
            },
        )
        .expect("legal drop");
        let dropped = resolution.map.unit(Vector::new(3, 4)).expect("deployed");
        assert!(dropped.is_completed());
        let transport = resolution.map.unit(Vector::new(3, 3)).expect("transport");
        assert!(transport.transports().is_empty());
    }

    #[test]
    fn attack_applies_damage_and_counter() {
        let map = base_map(
            vec![
                (Vector::new(2, 2), unit_of(TANK, 1)),
                (Vector::new(2, 3), unit_of(INFANTRY, 2)),
            ],
            Vec::new(),
        );
        let resolution = resolve_ok(
            &map,
            Action::AttackUnit {
                from: Vector::new(2, 2),
                to: Vector::new(2, 3),
            },
        )
        .expect("legal attack");

        match &resolution.responses[0] {
            ActionResponse::AttackUnit {
                damage,
                counter_damage,
                ..
            } => {
                // 75 base, full health, 5 defense: 75 * 100 / 105 = 71.
                assert_eq!(*damage, 71);
                // Survivor counters at 29 health into 30 armor: 10.
                assert_eq!(*counter_damage, Some(10));
            }
            other => panic!("expected AttackUnit, got {other:?}"),
        }
        let defender = resolution.map.unit(Vector::new(2, 3)).expect("survives");
        assert_eq!(defender.health(), 29);
        let attacker = resolution.map.unit(Vector::new(2, 2)).expect("attacker");
        assert_eq!(attacker.health(), 90);
        assert!(attacker.is_completed());

        let stats = resolution
            .map
            .player(PlayerId::new(1))
            .expect("player")
            .statistics();
        assert_eq!(stats.damage, 71);
        assert_eq!(stats.destroyed_units, 0);
    }

    #[test]
    fn lethal_attack_destroys_and_updates_statistics() {
        let weakened = unit_of(INFANTRY, 2).damaged(60);
        let map = base_map(
            vec![
                (Vector::new(2, 2), unit_of(TANK, 1)),
                (Vector::new(2, 3), weakened),
            ],
            Vec::new(),
        );
        let resolution = resolve_ok(
            &map,
            Action::AttackUnit {
                from: Vector::new(2, 2),
                to: Vector::new(2, 3),
            },
        )
        .expect("legal attack");

        assert!(matches!(
            resolution.responses[1],
            ActionResponse::UnitDestroyed { .. },
        ));
        assert!(resolution.map.unit(Vector::new(2, 3)).is_none());
        let attacker_stats = resolution
            .map
            .player(PlayerId::new(1))
            .expect("player")
            .statistics();
        assert_eq!(attacker_stats.destroyed_units, 1);
        let defender_stats = resolution
            .map
            .player(PlayerId::new(2))
            .expect("player")
            .statistics();
        assert_eq!(defender_stats.lost_units, 1);
        // Eliminating the last enemy unit ends the game: player 2 still
        // holds no HQ, so the default condition triggers.
        assert!(matches!(
            resolution.responses.last(),
            Some(ActionResponse::GameEnd {
                winning_team: Some(team),
                ..
            }) if team.get() == 1,
        ));
    }

    #[test]
    fn artillery_cannot_be_countered() {
        let map = base_map(
            vec![
                (Vector::new(2, 2), unit_of(ARTILLERY, 1)),
                (Vector::new(2, 5), unit_of(TANK, 2)),
                (Vector::new(7, 7), unit_of(INFANTRY, 2)),
            ],
            Vec::new(),
        );
        let resolution = resolve_ok(
            &map,
            Action::AttackUnit {
                from: Vector::new(2, 2),
                to: Vector::new(2, 5),
            },
        )
        .expect("legal bombardment");
        match &resolution.responses[0] {
            ActionResponse::AttackUnit { counter_damage, .. } => {
                assert_eq!(*counter_damage, None);
            }
            other => panic!("expected AttackUnit, got {other:?}"),
        }
    }

    #[test]
    fn adjacent_artillery_cannot_fire() {
        let map = base_map(
            vec![
                (Vector::new(2, 2), unit_of(ARTILLERY, 1)),
                (Vector::new(2, 3), unit_of(TANK, 2)),
            ],
            Vec::new(),
        );
        assert!(resolve_ok(
            &map,
            Action::AttackUnit {
                from: Vector::new(2, 2),
                to: Vector::new(2, 3),
            },
        )
        .is_none());
    }

    #[test]
    fn capture_is_two_step() {
        let map = base_map(
            vec![(Vector::new(4, 4), unit_of(INFANTRY, 1))],
            vec![(Vector::new(4, 4), Building::create(HOUSE, PlayerId::new(2)))],
        )
        .update_unit(Vector::new(5, 5), unit_of(INFANTRY, 2));

        let first = resolve_ok(&map, Action::Capture { at: Vector::new(4, 4) })
            .expect("capture starts");
        assert!(matches!(
            first.responses[0],
            ActionResponse::CaptureStarted { .. },
        ));
        let capturing = first.map.unit(Vector::new(4, 4)).expect("unit stays");
        assert!(capturing.is_capturing());

        // Next turn the same unit finishes the capture.
        let refreshed = first
            .map
            .update_unit(Vector::new(4, 4), capturing.clone().uncomplete());
        let second = resolve_ok(&refreshed, Action::Capture { at: Vector::new(4, 4) })
            .expect("capture completes");
        assert!(matches!(
            second.responses[0],
            ActionResponse::CaptureBuilding { .. },
        ));
        let building = second.map.building(Vector::new(4, 4)).expect("captured");
        assert_eq!(building.player(), PlayerId::new(1));
        assert_eq!(
            second
                .map
                .player(PlayerId::new(1))
                .expect("player")
                .statistics()
                .captured,
            1,
        );
    }

    #[test]
    fn non_capturing_units_cannot_capture() {
        let map = base_map(
            vec![(Vector::new(4, 4), unit_of(TANK, 1))],
            vec![(Vector::new(4, 4), Building::create(HOUSE, PlayerId::new(2)))],
        );
        assert!(resolve_ok(&map, Action::Capture { at: Vector::new(4, 4) }).is_none());
    }

    #[test]
    fn create_unit_deducts_funds_and_assigns_a_leader_name() {
        let map = base_map(
            Vec::new(),
            vec![(
                Vector::new(3, 3),
                Building::create(BARRACKS, PlayerId::new(1)),
            )],
        );
        let resolution = resolve_ok(
            &map,
            Action::CreateUnit {
                at: Vector::new(3, 3),
                unit_type: INFANTRY,
            },
        )
        .expect("legal production");

        let created = resolution.map.unit(Vector::new(3, 3)).expect("created");
        assert!(created.is_completed());
        assert!(created.is_leader(), "first of its type leads");
        assert_eq!(
            resolution
                .map
                .player(PlayerId::new(1))
                .expect("player")
                .funds(),
            2000 - 300,
        );
        assert_eq!(
            resolution
                .map
                .player(PlayerId::new(1))
                .expect("player")
                .statistics()
                .created_units,
            1,
        );
    }

    #[test]
    fn production_rejects_foreign_types_and_poverty() {
        let map = base_map(
            Vec::new(),
            vec![(
                Vector::new(3, 3),
                Building::create(BARRACKS, PlayerId::new(1)),
            )],
        );
        assert!(
            resolve_ok(
                &map,
                Action::CreateUnit {
                    at: Vector::new(3, 3),
                    unit_type: TANK,
                },
            )
            .is_none(),
            "barracks cannot build vehicles",
        );

        let broke = map.update_player(
            map.player(PlayerId::new(1))
                .expect("player")
                .clone()
                .with_funds(10),
        );
        assert!(resolve_ok(
            &broke,
            Action::CreateUnit {
                at: Vector::new(3, 3),
                unit_type: INFANTRY,
            },
        )
        .is_none());
    }

    #[test]
    fn pioneers_construct_buildings() {
        let map = base_map(vec![(Vector::new(2, 2), unit_of(PIONEER, 1))], Vec::new());
        let resolution = resolve_ok(
            &map,
            Action::CreateBuilding {
                at: Vector::new(2, 2),
                building_type: FACTORY,
            },
        )
        .expect("legal construction");
        let building = resolution.map.building(Vector::new(2, 2)).expect("built");
        assert_eq!(building.player(), PlayerId::new(1));
        assert_eq!(
            resolution
                .map
                .player(PlayerId::new(1))
                .expect("player")
                .funds(),
            2000 - 800,
        );
    }

    #[test]
    fn end_turn_advances_player_grants_income_and_heals() {
        let hurt = unit_of(SNIPER, 2).damaged(50);
        let map = base_map(
            vec![(Vector::new(5, 5), hurt)],
            vec![
                (Vector::new(5, 5), Building::create(HQ, PlayerId::new(2))),
                (Vector::new(6, 6), Building::create(HOUSE, PlayerId::new(2))),
                (Vector::new(1, 1), Building::create(HQ, PlayerId::new(1))),
                (Vector::new(2, 1), unit_hq_guard()),
            ],
        );
        let resolution = resolve_ok(&map, Action::EndTurn).expect("end turn");
        assert_eq!(resolution.map.current_player_id(), PlayerId::new(2));
        assert_eq!(resolution.map.round(), 1);
        assert_eq!(
            resolution
                .map
                .player(PlayerId::new(2))
                .expect("player")
                .funds(),
            2100,
        );
        let healed = resolution.map.unit(Vector::new(5, 5)).expect("sniper");
        assert_eq!(healed.health(), 70);

        let wrapped = resolve_ok(&resolution.map, Action::EndTurn).expect("wrap");
        assert_eq!(wrapped.map.current_player_id(), PlayerId::new(1));
        assert_eq!(wrapped.map.round(), 2);
    }

    fn unit_hq_guard() -> Building {
        Building::create(HOUSE, PlayerId::new(1))
    }

    #[test]
    fn survival_condition_ends_the_game() {
        let mut config = MapConfig::default();
        config.win_conditions = vec![WinCondition {
            kind: WinConditionKind::Survival { rounds: 2 },
            hidden: false,
            reward: None,
        }];
        let map = base_map(
            vec![
                (Vector::new(1, 1), unit_of(INFANTRY, 1)),
                (Vector::new(8, 8), unit_of(INFANTRY, 2)),
            ],
            Vec::new(),
        )
        .copy(vanguard_world::MapPatch {
            config: Some(config),
            current_player: Some(PlayerId::new(2)),
            ..vanguard_world::MapPatch::default()
        });

        let resolution = resolve_ok(&map, Action::EndTurn).expect("end turn");
        assert!(matches!(
            resolution.responses.last(),
            Some(ActionResponse::GameEnd {
                condition: Some(0),
                ..
            }),
        ));
    }
}

//! The single interpreter that turns responses into map transitions.
//!
//! Live resolution, client-side folding, and replay reconstruction all
//! flow through [`apply_action_response`]; there is deliberately no
//! second, replay-only interpreter. References to entities that are
//! absent (a fog-masked log replayed from a partial view) degrade to
//! no-ops, while unknown catalog identifiers fail loudly.

use vanguard_core::{
    building_info_or_unknown, skill_info_or_unknown, unit_info, unit_info_or_unknown,
    ActionResponse, PlayerId, PlayerStatistics, Reward, UnitTypeId, UnknownTypeError, Vector,
    WeaponInfo, FIELD_REPAIRS, WAR_BONDS,
};
use vanguard_world::{
    assign_deterministic_unit_names, query, MapData, TransportedUnit, Unit,
};

/// Health restored to a unit starting its turn on an owned building.
pub const BUILDING_HEAL: u16 = 20;
/// Health restored per unit by the field repairs skill.
pub const FIELD_REPAIRS_HEAL: u16 = 20;
/// Funds granted by the war bonds skill.
pub const WAR_BONDS_PAYOUT: u32 = 1000;
/// Power charge gained by consuming a crystal.
pub const CRYSTAL_CHARGE: u32 = 500;

/// Picks the first weapon able to reach the given distance that still
/// has rounds. Iteration order over the catalog list is the tie-break.
#[must_use]
pub fn select_weapon<'a>(
    unit: &Unit,
    weapons: &'a [WeaponInfo],
    distance: u32,
) -> Option<&'a WeaponInfo> {
    weapons
        .iter()
        .find(|weapon| weapon.in_range(distance) && unit.rounds(weapon.id) != Some(0))
}

/// Applies one resolved response to a map, producing the next snapshot.
pub fn apply_action_response(
    map: &MapData,
    response: &ActionResponse,
) -> Result<MapData, UnknownTypeError> {
    match response {
        ActionResponse::Start => Ok(apply_start(map)),
        ActionResponse::Move {
            from,
            to,
            fuel,
            loaded,
            ..
        } => Ok(apply_move(map, *from, *to, *fuel, *loaded)),
        ActionResponse::DropUnit { from, index, to } => Ok(apply_drop(map, *from, *index, *to)),
        ActionResponse::AttackUnit {
            from,
            to,
            damage,
            counter_damage,
        } => Ok(apply_attack_unit(map, *from, *to, *damage, *counter_damage)),
        ActionResponse::UnitDestroyed { at, player } => Ok(apply_unit_destroyed(map, *at, *player)),
        ActionResponse::AttackBuilding { from, to, damage } => {
            Ok(apply_attack_building(map, *from, *to, *damage))
        }
        ActionResponse::BuildingDestroyed { at, player } => {
            Ok(apply_building_destroyed(map, *at, *player))
        }
        ActionResponse::CaptureStarted { at, .. } => Ok(apply_capture_started(map, *at)),
        ActionResponse::CaptureBuilding { at, player } => Ok(apply_capture(map, *at, *player)),
        ActionResponse::CreateUnit {
            at,
            unit_type,
            player,
            name,
            free,
        } => apply_create_unit(map, *at, *unit_type, *player, *name, *free),
        ActionResponse::CreateBuilding { at, building_type } => {
            let info = building_info_or_unknown(*building_type, "apply_action_response")?;
            Ok(apply_create_building(map, *at, info.id, info.cost))
        }
        ActionResponse::ActivatePower { player, skill } => {
            let info = skill_info_or_unknown(*skill, "apply_action_response")?;
            Ok(apply_power(map, *player, info.id, info.charge_cost))
        }
        ActionResponse::ActivateCrystal { player } => Ok(apply_crystal(map, *player)),
        ActionResponse::CompleteUnit { at } => Ok(apply_complete(map, *at)),
        ActionResponse::EndTurn { next, round, .. } => Ok(apply_end_turn(map, *next, *round)),
        ActionResponse::ReceiveReward { player, reward } => Ok(apply_reward(map, *player, *reward)),
        ActionResponse::SetViewer { player } => Ok(apply_set_viewer(map, *player)),
        ActionResponse::CharacterMessage { .. }
        | ActionResponse::SecretDiscovered { .. }
        | ActionResponse::GameEnd { .. } => Ok(map.clone()),
    }
}

fn apply_start(map: &MapData) -> MapData {
    let mut next = map.clone();
    let seed = map.config().seed_capital;
    let players: Vec<PlayerId> = map.players().keys().copied().collect();
    for player_id in players {
        let funds = seed + query::income(&next, player_id);
        if let Some(player) = next.player(player_id) {
            next = next.update_player(player.clone().with_funds(funds));
        }
    }
    for (vector, unit) in map.units() {
        if let Some(info) = unit_info(unit.unit_type()) {
            next = next.update_unit(*vector, unit.clone().recover(info));
        }
    }
    assign_deterministic_unit_names(&next)
}

fn apply_move(map: &MapData, from: Vector, to: Vector, fuel: u16, loaded: bool) -> MapData {
    let Some(unit) = map.unit(from) else {
        return map.clone();
    };
    let moved = unit.clone().stop_capture().with_fuel(fuel);
    let without = map.remove_unit(from);
    if loaded {
        match without.unit(to) {
            Some(transport) => {
                let carrying = transport.clone().load(moved.into_transported());
                without.update_unit(to, carrying)
            }
            None => without,
        }
    } else {
        without.update_unit(to, moved.complete())
    }
}

fn apply_drop(map: &MapData, from: Vector, index: usize, to: Vector) -> MapData {
    let Some(transport) = map.unit(from) else {
        return map.clone();
    };
    let (transport, unloaded) = transport.clone().unload(index);
    let next = map.update_unit(from, transport.complete());
    match unloaded {
        Some(unit) => next.update_unit(to, unit.deploy()),
        None => next,
    }
}

fn apply_attack_unit(
    map: &MapData,
    from: Vector,
    to: Vector,
    damage: u16,
    counter_damage: Option<u16>,
) -> MapData {
    let (Some(attacker), Some(defender)) = (map.unit(from), map.unit(to)) else {
        return map.clone();
    };
    let attacker_player = attacker.player();
    let defender_player = defender.player();
    let distance = from.distance(to);

    let mut attacker = attacker.clone();
    let mut defender = defender.clone();

    if let Some(info) = unit_info(attacker.unit_type()) {
        if let Some(weapon) = select_weapon(&attacker, info.weapons, distance) {
            attacker = attacker.consume_ammo(weapon.id);
        }
    }
    let defender_dies = defender.health() <= damage;
    defender = defender.damaged(damage);

    let mut next = map.clone();
    next = credit_damage(&next, attacker_player, damage, defender_dies, &defender);

    if let Some(counter) = counter_damage {
        if let Some(info) = unit_info(defender.unit_type()) {
            if let Some(weapon) = select_weapon(&defender, info.weapons, distance) {
                defender = defender.consume_ammo(weapon.id);
            }
        }
        let attacker_dies = attacker.health() <= counter;
        attacker = attacker.damaged(counter);
        next = credit_damage(&next, defender_player, counter, attacker_dies, &attacker);
    }

    next.update_unit(from, attacker.complete()).update_unit(to, defender)
}

fn credit_damage(
    map: &MapData,
    dealer: PlayerId,
    damage: u16,
    destroyed: bool,
    victim: &Unit,
) -> MapData {
    let Some(player) = map.player(dealer) else {
        return map.clone();
    };
    let mut statistics = player.statistics();
    statistics.damage += u32::from(damage);
    if destroyed {
        statistics.destroyed_units += 1 + carried_count(victim.transports()) as u32;
    }
    let updated = player
        .clone()
        .with_statistics(statistics)
        .charge_power(u32::from(damage));
    map.update_player(updated)
}

fn apply_unit_destroyed(map: &MapData, at: Vector, owner: PlayerId) -> MapData {
    let carried = map
        .unit(at)
        .map(|unit| carried_count(unit.transports()))
        .unwrap_or(0);
    let next = map.remove_unit(at);
    bump_stats(&next, owner, |statistics| PlayerStatistics {
        lost_units: statistics.lost_units + 1 + carried as u32,
        ..statistics
    })
}

fn apply_attack_building(map: &MapData, from: Vector, to: Vector, damage: u16) -> MapData {
    let (Some(attacker), Some(building)) = (map.unit(from), map.building(to)) else {
        return map.clone();
    };
    let attacker_player = attacker.player();
    let distance = from.distance(to);

    let mut attacker = attacker.clone();
    if let Some(info) = unit_info(attacker.unit_type()) {
        if let Some(weapon) = select_weapon(&attacker, info.weapons, distance) {
            attacker = attacker.consume_ammo(weapon.id);
        }
    }
    let destroyed = building.health() <= damage;
    let damaged = building.clone().damaged(damage);

    let mut next = map.update_unit(from, attacker.complete());
    next = next.update_building(to, damaged);
    bump_stats(&next, attacker_player, |statistics| PlayerStatistics {
        damage: statistics.damage + u32::from(damage),
        destroyed_buildings: statistics.destroyed_buildings + u32::from(destroyed),
        ..statistics
    })
}

fn apply_building_destroyed(map: &MapData, at: Vector, owner: PlayerId) -> MapData {
    let next = map.remove_building(at);
    bump_stats(&next, owner, |statistics| PlayerStatistics {
        lost_buildings: statistics.lost_buildings + 1,
        ..statistics
    })
}

fn apply_capture_started(map: &MapData, at: Vector) -> MapData {
    match map.unit(at) {
        Some(unit) => map.update_unit(at, unit.clone().start_capture().complete()),
        None => map.clone(),
    }
}

fn apply_capture(map: &MapData, at: Vector, player: PlayerId) -> MapData {
    let Some(building) = map.building(at) else {
        return map.clone();
    };
    let mut next = map.update_building(at, building.clone().capture(player));
    if let Some(unit) = next.unit(at) {
        next = next.update_unit(at, unit.clone().stop_capture().complete());
    }
    bump_stats(&next, player, |statistics| PlayerStatistics {
        captured: statistics.captured + 1,
        ..statistics
    })
}

fn apply_create_unit(
    map: &MapData,
    at: Vector,
    unit_type: UnitTypeId,
    owner: PlayerId,
    name: Option<i32>,
    free: bool,
) -> Result<MapData, UnknownTypeError> {
    let info = unit_info_or_unknown(unit_type, "apply_action_response")?;
    let mut next = map.clone();
    if !free {
        if let Some(player) = next.player(owner) {
            let funds = player.funds().saturating_sub(info.cost);
            next = next.update_player(player.clone().with_funds(funds));
        }
    }
    next = next.update_unit(at, Unit::create(info, owner).with_name(name).complete());
    Ok(bump_stats(&next, owner, |statistics| PlayerStatistics {
        created_units: statistics.created_units + 1,
        ..statistics
    }))
}

fn apply_create_building(
    map: &MapData,
    at: Vector,
    building_type: vanguard_core::BuildingTypeId,
    cost: Option<u32>,
) -> MapData {
    let Some(builder) = map.unit(at) else {
        return map.clone();
    };
    let owner = builder.player();
    let mut next = map.update_unit(at, builder.clone().complete());
    if let (Some(cost), Some(player)) = (cost, next.player(owner)) {
        let funds = player.funds().saturating_sub(cost);
        next = next.update_player(player.clone().with_funds(funds));
    }
    next = next.update_building(at, vanguard_world::Building::create(building_type, owner));
    bump_stats(&next, owner, |statistics| PlayerStatistics {
        created_buildings: statistics.created_buildings + 1,
        ..statistics
    })
}

fn apply_power(
    map: &MapData,
    player_id: PlayerId,
    skill: vanguard_core::SkillId,
    charge_cost: u32,
) -> MapData {
    let Some(player) = map.player(player_id) else {
        return map.clone();
    };
    let spent = player.charge().min(charge_cost);
    let updated = player
        .clone()
        .consume_charge(spent)
        .unwrap_or_else(|| player.clone());
    let mut next = map.update_player(updated);

    if skill == FIELD_REPAIRS {
        let positions: Vec<Vector> = query::unit_positions(&next, player_id);
        for vector in positions {
            if let Some(unit) = next.unit(vector) {
                let healed = unit.clone().with_health(unit.health() + FIELD_REPAIRS_HEAL);
                next = next.update_unit(vector, healed);
            }
        }
    } else if skill == WAR_BONDS {
        if let Some(player) = next.player(player_id) {
            next = next.update_player(player.clone().earn(WAR_BONDS_PAYOUT));
        }
    }
    next
}

fn apply_crystal(map: &MapData, player_id: PlayerId) -> MapData {
    match map.player(player_id) {
        Some(player) => map.update_player(
            player
                .clone()
                .with_crystal(None)
                .charge_power(CRYSTAL_CHARGE),
        ),
        None => map.clone(),
    }
}

fn apply_complete(map: &MapData, at: Vector) -> MapData {
    match map.unit(at) {
        Some(unit) => map.update_unit(at, unit.clone().complete()),
        None => map.clone(),
    }
}

fn apply_end_turn(map: &MapData, next_player: PlayerId, round: u32) -> MapData {
    let mut next = map.copy(vanguard_world::MapPatch {
        current_player: Some(next_player),
        round: Some(round),
        ..vanguard_world::MapPatch::default()
    });

    let income = query::income(&next, next_player);
    if let Some(player) = next.player(next_player) {
        next = next.update_player(player.clone().earn(income));
    }

    let positions: Vec<Vector> = query::unit_positions(&next, next_player);
    for vector in positions {
        let Some(unit) = next.unit(vector) else {
            continue;
        };
        let mut refreshed = unit.clone().uncomplete();
        let on_own_building = next
            .building(vector)
            .is_some_and(|building| building.player() == next_player);
        if on_own_building {
            if let Some(info) = unit_info(refreshed.unit_type()) {
                let healed = refreshed.health() + BUILDING_HEAL;
                refreshed = refreshed
                    .with_health(healed)
                    .resupply(info);
            }
        }
        next = next.update_unit(vector, refreshed);
    }
    next
}

fn apply_reward(map: &MapData, player_id: PlayerId, reward: Reward) -> MapData {
    let Some(player) = map.player(player_id) else {
        return map.clone();
    };
    let updated = match reward {
        Reward::Funds { amount } => player.clone().earn(amount),
        Reward::Skill { skill } => player.clone().learn_skill(skill),
    };
    map.update_player(updated)
}

fn apply_set_viewer(map: &MapData, player: PlayerId) -> MapData {
    if map.player(player).is_none() {
        return map.clone();
    }
    map.copy(vanguard_world::MapPatch {
        current_player: Some(player),
        ..vanguard_world::MapPatch::default()
    })
}

fn bump_stats<F>(map: &MapData, player_id: PlayerId, update: F) -> MapData
where
    F: FnOnce(PlayerStatistics) -> PlayerStatistics,
{
    match map.player(player_id) {
        Some(player) => {
            let statistics = update(player.statistics());
            map.update_player(player.clone().with_statistics(statistics))
        }
        None => map.clone(),
    }
}

fn carried_count(transports: &[TransportedUnit]) -> usize {
    transports
        .iter()
        .map(|unit| 1 + carried_count(unit.transports()))
        .sum()
}

//! Character-name assignment and leader bookkeeping.
//!
//! Every unit may carry a signed name index into a fixed pool. The sign
//! encodes leader status, so the flag survives every serialization
//! round trip without a side table. Two assignment paths exist: a
//! seeded-RNG path for fresh starts and a deterministic whole-map hash
//! for games that must reproduce identically across clients and replays.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use sha2::{Digest, Sha256};
use vanguard_core::{unit_info, NameGender, PlayerId, UnitInfo, UnitTypeId, Vector};

use crate::unit::{follower_name, leader_name, TransportedUnit, Unit};
use crate::MapData;

const FEMALE_NAMES: [&str; 12] = [
    "Asta", "Brina", "Cleo", "Dara", "Edda", "Freya", "Gwen", "Hilda", "Iris", "Juni", "Kara",
    "Lena",
];
const MALE_NAMES: [&str; 11] = [
    "Arlo", "Bram", "Cassius", "Dag", "Emil", "Finn", "Gideon", "Holt", "Ivo", "Jarek", "Kai",
];
const UNKNOWN_NAMES: [&str; 10] = [
    "Ash", "Blake", "Cedar", "Dune", "Ember", "Flint", "Gale", "Harbor", "Indigo", "Juniper",
];

/// Names available per gender pool. Pools are truncated to the smallest
/// pool so an index is valid regardless of gender.
#[must_use]
pub fn name_pool_size() -> usize {
    FEMALE_NAMES
        .len()
        .min(MALE_NAMES.len())
        .min(UNKNOWN_NAMES.len())
}

fn pool_for(gender: NameGender) -> &'static [&'static str] {
    match gender {
        NameGender::Female => &FEMALE_NAMES,
        NameGender::Male => &MALE_NAMES,
        NameGender::Unknown => &UNKNOWN_NAMES,
    }
}

/// Resolves the display name for a unit's signed name index.
#[must_use]
pub fn unit_display_name(info: &UnitInfo, name: i32) -> Option<&'static str> {
    let index = if name < 0 {
        (-name - 1) as usize
    } else {
        name as usize
    };
    pool_for(info.gender).get(index).copied()
}

/// Computes the deterministic name index for a unit.
///
/// The hash covers the whole map state, so the same arguments always
/// produce the same index while any change elsewhere on the map may
/// shift it; the `offset` separates units that share every other input.
#[must_use]
pub fn deterministic_unit_name(
    map: &MapData,
    vector: Vector,
    player: PlayerId,
    info: &UnitInfo,
    offset: u32,
) -> i32 {
    let mut hasher = Sha256::new();
    hasher.update(map_seed(map).to_le_bytes());
    hasher.update(vector.x().to_le_bytes());
    hasher.update(vector.y().to_le_bytes());
    hasher.update([player.get()]);
    hasher.update(info.id.get().to_le_bytes());
    hasher.update(offset.to_le_bytes());
    let value = finalize_seed(hasher);
    follower_name((value % name_pool_size() as u64) as usize)
}

fn map_seed(map: &MapData) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(map.size().width().to_le_bytes());
    hasher.update(map.size().height().to_le_bytes());
    hasher.update(map.round().to_le_bytes());
    for (vector, unit) in map.units() {
        hasher.update(vector.x().to_le_bytes());
        hasher.update(vector.y().to_le_bytes());
        hasher.update(unit.unit_type().get().to_le_bytes());
        hasher.update([unit.player().get()]);
        hasher.update(unit.health().to_le_bytes());
        hasher.update(unit.fuel().to_le_bytes());
    }
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

/// Collects, per player, the unit types that already field a leader.
/// Transported units are visited recursively since carriers can nest
/// one further level of carried units.
#[must_use]
pub fn leaders(map: &MapData) -> BTreeMap<PlayerId, BTreeSet<UnitTypeId>> {
    let mut tagged: BTreeMap<PlayerId, BTreeSet<UnitTypeId>> = BTreeMap::new();
    for unit in map.units().values() {
        if unit.is_leader() {
            let _ = tagged.entry(unit.player()).or_default().insert(unit.unit_type());
        }
        collect_carried_leaders(unit.transports(), &mut tagged);
    }
    tagged
}

fn collect_carried_leaders(
    transports: &[TransportedUnit],
    tagged: &mut BTreeMap<PlayerId, BTreeSet<UnitTypeId>>,
) {
    for unit in transports {
        if unit.is_leader() {
            let _ = tagged.entry(unit.player()).or_default().insert(unit.unit_type());
        }
        collect_carried_leaders(unit.transports(), tagged);
    }
}

/// Assigns names to every unnamed unit using the supplied RNG. The first
/// unnamed unit of each `(player, type)` pair without an existing leader
/// becomes that pair's leader.
#[must_use]
pub fn assign_unit_names<R: Rng>(map: &MapData, rng: &mut R) -> MapData {
    assign_names(map, |_, _, _, _| {
        rng.gen_range(0..name_pool_size() as u64) as usize
    })
}

/// Assigns names to every unnamed unit deterministically from the map
/// hash, for games that must replay identically on every client.
#[must_use]
pub fn assign_deterministic_unit_names(map: &MapData) -> MapData {
    assign_names(map, |player, vector, unit_type, offset| {
        let info = unit_info(unit_type).expect("placed units reference known types");
        deterministic_unit_name(map, vector, player, info, offset) as usize
    })
}

fn assign_names<F>(map: &MapData, mut pick: F) -> MapData
where
    F: FnMut(PlayerId, Vector, UnitTypeId, u32) -> usize,
{
    let mut tagged = leaders(map);
    let mut offset: u32 = 0;
    let mut units = BTreeMap::new();
    for (vector, unit) in map.units() {
        let renamed = rename_unit(unit.clone(), *vector, &mut tagged, &mut offset, &mut pick);
        let _ = units.insert(*vector, renamed);
    }
    map.copy(crate::MapPatch {
        units: Some(units),
        ..crate::MapPatch::default()
    })
}

fn rename_unit<F>(
    unit: Unit,
    vector: Vector,
    tagged: &mut BTreeMap<PlayerId, BTreeSet<UnitTypeId>>,
    offset: &mut u32,
    pick: &mut F,
) -> Unit
where
    F: FnMut(PlayerId, Vector, UnitTypeId, u32) -> usize,
{
    let unit = if unit.name().is_none() {
        let index = pick(unit.player(), vector, unit.unit_type(), *offset);
        *offset += 1;
        let name = claim_name(unit.player(), unit.unit_type(), index, tagged);
        unit.with_name(Some(name))
    } else {
        unit
    };

    let transports: Vec<TransportedUnit> = unit
        .transports()
        .iter()
        .map(|carried| rename_carried(carried.clone(), vector, tagged, offset, pick))
        .collect();
    unit.replace_transports(transports)
}

fn rename_carried<F>(
    unit: TransportedUnit,
    vector: Vector,
    tagged: &mut BTreeMap<PlayerId, BTreeSet<UnitTypeId>>,
    offset: &mut u32,
    pick: &mut F,
) -> TransportedUnit
where
    F: FnMut(PlayerId, Vector, UnitTypeId, u32) -> usize,
{
    let unit = if unit.name().is_none() {
        let index = pick(unit.player(), vector, unit.unit_type(), *offset);
        *offset += 1;
        let name = claim_name(unit.player(), unit.unit_type(), index, tagged);
        unit.with_name(Some(name))
    } else {
        unit
    };

    let transports: Vec<TransportedUnit> = unit
        .transports()
        .iter()
        .map(|carried| rename_carried(carried.clone(), vector, tagged, offset, pick))
        .collect();
    unit.replace_transports(transports)
}

fn claim_name(
    player: PlayerId,
    unit_type: UnitTypeId,
    index: usize,
    tagged: &mut BTreeMap<PlayerId, BTreeSet<UnitTypeId>>,
) -> i32 {
    let types = tagged.entry(player).or_default();
    if types.insert(unit_type) {
        leader_name(index)
    } else {
        follower_name(index)
    }
}

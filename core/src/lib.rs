#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Vanguard engine.
//!
//! This crate defines the message surface that connects adapters, the
//! immutable world model, and the pure resolution systems: grid
//! primitives, the process-wide type catalogs, the [`Action`] /
//! [`ActionResponse`] tagged variants that carry every state transition,
//! player statistics, and the wire encodings used by replay logs and the
//! worker boundary.

mod action;
mod catalog;
mod stats;
mod vector;
pub mod wire;

pub use action::{Action, ActionResponse, Reward};
pub use catalog::{
    building_info, building_info_or_unknown, skill_info, skill_info_or_unknown, tile_info,
    tile_info_or_unknown, unit_info, unit_info_or_unknown, BuildingInfo, BuildingTypeId,
    NameGender, PlayerId, SkillId, SkillInfo, TeamId, TileId, TileInfo, UnitInfo, UnitTypeId,
    UnknownTypeError, WeaponId, WeaponInfo, ARTILLERY, BARRACKS, FACTORY, FIELD_REPAIRS, FOREST,
    HOUSE, HQ, INFANTRY, JEEP, MOUNTAIN, PIONEER, PLAINS, RIVER, ROAD, SEA, SNIPER, TANK,
    TELEPORTER, WAR_BONDS,
};
pub use stats::{PlainPlayerStatistics, PlayerStatistics};
pub use vector::{clockwise_order, symmetric_positions, SizeVector, Symmetry, Vector};

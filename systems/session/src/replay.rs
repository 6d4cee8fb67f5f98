//! Replay-log decoding and reconstruction.
//!
//! A replay is a linear log of typed entries. `map` entries re-root the
//! working state and recompute vision for the configured viewer;
//! `actions` entries replay each encoded response through the same
//! [`apply_action_response`] used by live play. There is deliberately no
//! second, replay-only interpreter.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vanguard_core::{wire::maybe_decode_action_response, PlayerId, UnknownTypeError};
use vanguard_system_actions::apply_action_response;
use vanguard_world::{MapData, MapError, PlainMap, Vision};

/// Errors raised while reconstructing a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A `map` entry did not validate.
    #[error(transparent)]
    Map(#[from] MapError),
    /// A replayed response referenced unknown catalog data.
    #[error(transparent)]
    UnknownType(#[from] UnknownTypeError),
}

/// A participant listed in the replay roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayUser {
    /// Display name of the participant.
    pub name: String,
    /// Packed `"unitId-variant-color"` character customization string.
    pub character: String,
}

/// Character customization unpacked from its wire string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayCharacter {
    /// Unit type portraying the character.
    pub unit_id: u16,
    /// Portrait variant index.
    pub variant: u8,
    /// Palette index.
    pub color: u8,
}

/// Parses the packed `"unitId-variant-color"` string by integer
/// splitting. Malformed strings yield `None`, never a panic.
#[must_use]
pub fn parse_character(packed: &str) -> Option<ReplayCharacter> {
    let mut parts = packed.split('-');
    let unit_id = parts.next()?.parse().ok()?;
    let variant = parts.next()?.parse().ok()?;
    let color = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ReplayCharacter {
        unit_id,
        variant,
        color,
    })
}

/// One entry of a persisted replay log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayEntry {
    /// Metadata about the recorded game.
    Info {
        /// Display name of the recorded game.
        name: String,
    },
    /// Participant roster.
    Users {
        /// The participants in seat order.
        users: Vec<ReplayUser>,
    },
    /// Full snapshot to (re)root the working state from.
    Map {
        /// The snapshot in wire form.
        map: PlainMap,
    },
    /// A batch of encoded responses to replay in order.
    Actions {
        /// Encoded responses, applied strictly in order.
        actions: Vec<String>,
    },
}

/// Working state reconstructed from a replay log.
#[derive(Clone, Debug)]
pub struct ReplayGameState {
    /// Current map after every applied entry.
    pub map: MapData,
    /// Vision of the configured viewer over the current map.
    pub vision: Vision,
    /// Roster from the most recent `users` entry.
    pub users: Vec<ReplayUser>,
}

/// Folds a replay log into its final game state.
///
/// Returns `None` when the log contains no `map` entry to root from.
/// `actions` entries that precede the first `map` entry are ignored,
/// matching the persisted format's guarantees.
pub fn reconstruct(
    entries: &[ReplayEntry],
    viewer: Option<PlayerId>,
) -> Result<Option<ReplayGameState>, ReplayError> {
    let mut users = Vec::new();
    let mut state: Option<(MapData, Vision)> = None;

    for entry in entries {
        match entry {
            ReplayEntry::Info { .. } => {}
            ReplayEntry::Users { users: roster } => {
                users = roster.clone();
            }
            ReplayEntry::Map { map } => {
                let map = MapData::from_plain(map)?;
                let vision =
                    Vision::compute(&map, viewer.unwrap_or_else(|| map.current_player_id()));
                state = Some((map, vision));
            }
            ReplayEntry::Actions { actions } => {
                let Some((map, _)) = &state else {
                    continue;
                };
                let mut replayed = map.clone();
                for encoded in actions {
                    let response = maybe_decode_action_response(encoded);
                    replayed = apply_action_response(&replayed, &response)?;
                }
                let vision = Vision::compute(
                    &replayed,
                    viewer.unwrap_or_else(|| replayed.current_player_id()),
                );
                state = Some((replayed, vision));
            }
        }
    }

    Ok(state.map(|(map, vision)| ReplayGameState { map, vision, users }))
}

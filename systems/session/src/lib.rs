#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game-state history: client-side folding, per-turn undo, replay
//! reconstruction, the worker channel, and the injected clock.

mod clock;
mod replay;
mod worker;

pub use clock::{Clock, ClockSync, FixedClock, SystemClock};
pub use replay::{
    parse_character, reconstruct, ReplayCharacter, ReplayEntry, ReplayError, ReplayGameState,
    ReplayUser,
};
pub use worker::{execute, ResolveRequest, ResolveResponse, Worker};

use rand::Rng;
use tracing::debug;
use vanguard_core::{Action, ActionResponse, UnknownTypeError};
use vanguard_system_actions::{apply_action_response, on_game_end, resolve, Resolution};
use vanguard_system_effects::{Effects, TriggerKind};
use vanguard_world::{MapData, Vision};

/// Snapshot retained at a turn boundary, enabling undo within the turn.
///
/// Responses are retained as one batch per resolved action so undo can
/// only ever roll back whole, atomic resolution chains.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnState {
    snapshot: MapData,
    batches: Vec<Vec<ActionResponse>>,
}

impl TurnState {
    fn at_boundary(map: &MapData) -> Self {
        Self {
            snapshot: map.clone(),
            batches: Vec::new(),
        }
    }
}

/// What a client retains of a running game.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientGame {
    /// Current authoritative snapshot.
    pub state: MapData,
    /// Trailing response of the last folded batch.
    pub last_action: Option<ActionResponse>,
    /// Scripted effect configuration of the game.
    pub effects: Effects,
    /// Turn-boundary snapshot; `None` once the game has ended.
    pub turn_state: Option<TurnState>,
    /// Whether a `GameEnd` has been folded.
    pub ended: bool,
}

impl ClientGame {
    /// Creates the client view at a turn boundary.
    #[must_use]
    pub fn new(state: MapData, effects: Effects) -> Self {
        Self {
            turn_state: Some(TurnState::at_boundary(&state)),
            state,
            last_action: None,
            effects,
            ended: false,
        }
    }
}

/// Folds a resolved batch into the client view.
///
/// The retained turn snapshot resets whenever the acting player or the
/// round changes and is dropped for good once the game ends: undo never
/// crosses a turn boundary and never resurrects a finished game.
#[must_use]
pub fn fold_responses(
    game: &ClientGame,
    responses: &[ActionResponse],
    state: MapData,
) -> ClientGame {
    let ended = game.ended
        || responses
            .iter()
            .any(|response| matches!(response, ActionResponse::GameEnd { .. }));

    let turn_state = if ended {
        None
    } else {
        match &game.turn_state {
            Some(turn_state)
                if turn_state.snapshot.current_player_id() == state.current_player_id()
                    && turn_state.snapshot.round() == state.round() =>
            {
                let mut retained = turn_state.clone();
                retained.batches.push(responses.to_vec());
                Some(retained)
            }
            _ => Some(TurnState::at_boundary(&state)),
        }
    };

    ClientGame {
        state,
        last_action: responses.last().cloned(),
        effects: game.effects.clone(),
        turn_state,
        ended,
    }
}

/// What `undo` should roll back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndoKind {
    /// Roll back the last non-trivial action of the current turn.
    Action,
    /// Roll back to the turn-start snapshot.
    Turn,
}

/// Rolls back within the current turn.
///
/// A no-op — the same value comes back — when no turn snapshot is
/// retained, the game has ended, or the acting player is not
/// human-controlled.
pub fn undo(game: &ClientGame, kind: UndoKind) -> Result<ClientGame, UnknownTypeError> {
    let Some(turn_state) = &game.turn_state else {
        return Ok(game.clone());
    };
    if game.ended {
        return Ok(game.clone());
    }
    let human = game
        .state
        .player(game.state.current_player_id())
        .is_some_and(vanguard_world::Player::is_human);
    if !human {
        return Ok(game.clone());
    }

    let retained = match kind {
        UndoKind::Turn => Vec::new(),
        UndoKind::Action => {
            // Trailing bookkeeping batches are not user-visible actions;
            // strip them before dropping the last real one.
            let mut batches = turn_state.batches.clone();
            while batches
                .last()
                .is_some_and(|batch| batch.iter().all(ActionResponse::is_bookkeeping))
            {
                let _ = batches.pop();
            }
            let _ = batches.pop();
            batches
        }
    };

    let mut state = turn_state.snapshot.clone();
    for response in retained.iter().flatten() {
        state = apply_action_response(&state, response)?;
    }

    Ok(ClientGame {
        state,
        last_action: retained
            .last()
            .and_then(|batch| batch.last())
            .cloned(),
        effects: game.effects.clone(),
        turn_state: Some(TurnState {
            snapshot: turn_state.snapshot.clone(),
            batches: retained,
        }),
        ended: false,
    })
}

/// Resolves an action and layers scripted effects on top.
///
/// When the resolved chain ends the game, the `GameEnd` trigger tables
/// run for the first human player (falling back to the acting player)
/// and the resulting sub-sequence is spliced into the log by
/// [`on_game_end`].
pub fn advance<R: Rng + ?Sized>(
    map: &MapData,
    effects: &Effects,
    action: &Action,
    rng: &mut R,
) -> Result<Option<Resolution>, UnknownTypeError> {
    let vision = Vision::compute(map, map.current_player_id());
    let Some(resolution) = resolve(map, &vision, action)? else {
        return Ok(None);
    };

    let ends_game = matches!(
        resolution.responses.last(),
        Some(ActionResponse::GameEnd { .. }),
    );
    if !ends_game {
        return Ok(Some(resolution));
    }

    let viewer = map
        .first_human_player()
        .unwrap_or_else(|| map.current_player_id());
    let scripted = effects.apply(&resolution.map, TriggerKind::GameEnd, viewer, rng);
    debug!(count = scripted.len(), "applying end-of-game effects");
    let (responses, final_map) = on_game_end(&resolution.map, resolution.responses, viewer, scripted)?;
    Ok(Some(Resolution {
        responses,
        map: final_map,
    }))
}

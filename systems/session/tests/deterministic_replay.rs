use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vanguard_core::{
    unit_info, wire::encode_action_response, Action, ActionResponse, PlayerId, SizeVector, TeamId,
    Vector, BARRACKS, HOUSE, HQ, INFANTRY, PLAINS, TANK,
};
use vanguard_system_ai::{next_action, AiRegistry};
use vanguard_system_effects::Effects;
use vanguard_system_session::{advance, reconstruct, ReplayEntry};
use vanguard_world::{Building, MapConfig, MapData, Player, PlayerControl, Team, Unit};

const MAX_DECISIONS: usize = 400;

fn computer(id: u8) -> Player {
    Player::new(
        PlayerId::new(id),
        TeamId::new(id),
        600,
        PlayerControl::Computer {
            strategy: "balanced".to_owned(),
        },
    )
}

fn skirmish_map() -> MapData {
    MapData::create(
        SizeVector::new(8, 8),
        vec![PLAINS; 64],
        vec![
            (
                Vector::new(2, 2),
                Unit::create(unit_info(INFANTRY).expect("infantry"), PlayerId::new(1)),
            ),
            (
                Vector::new(3, 2),
                Unit::create(unit_info(TANK).expect("tank"), PlayerId::new(1)),
            ),
            (
                Vector::new(7, 7),
                Unit::create(unit_info(INFANTRY).expect("infantry"), PlayerId::new(2)),
            ),
        ],
        vec![
            (Vector::new(1, 1), Building::create(HQ, PlayerId::new(1))),
            (Vector::new(8, 8), Building::create(HQ, PlayerId::new(2))),
            (Vector::new(2, 1), Building::create(BARRACKS, PlayerId::new(1))),
            (Vector::new(7, 8), Building::create(HOUSE, PlayerId::new(2))),
        ],
        vec![
            Team::new(TeamId::new(1), vec![PlayerId::new(1)]),
            Team::new(TeamId::new(2), vec![PlayerId::new(2)]),
        ],
        vec![computer(1), computer(2)],
        MapConfig {
            seed_capital: 500,
            round_limit: Some(6),
            ..MapConfig::default()
        },
        PlayerId::new(1),
        1,
    )
    .expect("valid map")
}

struct PlayedGame {
    log: Vec<ActionResponse>,
    final_map: MapData,
}

fn play_to_completion() -> PlayedGame {
    let registry = AiRegistry::default();
    let effects = Effects::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    let mut map = skirmish_map();
    let mut log = Vec::new();

    let start = advance(&map, &effects, &Action::Start, &mut rng)
        .expect("no fatal error")
        .expect("start is legal");
    log.extend(start.responses.clone());
    map = start.map;

    for _ in 0..MAX_DECISIONS {
        let action = next_action(&map, &registry).expect("no fatal error");
        let resolution = advance(&map, &effects, &action, &mut rng)
            .expect("no fatal error")
            .expect("AI actions are legal");
        log.extend(resolution.responses.clone());
        map = resolution.map;
        if log
            .iter()
            .any(|response| matches!(response, ActionResponse::GameEnd { .. }))
        {
            break;
        }
    }

    assert!(
        log.iter()
            .any(|response| matches!(response, ActionResponse::GameEnd { .. })),
        "self-play must finish within the decision budget",
    );
    PlayedGame {
        log,
        final_map: map,
    }
}

fn fingerprint(game: &PlayedGame) -> u64 {
    let mut hasher = DefaultHasher::new();
    for response in &game.log {
        encode_action_response(response).hash(&mut hasher);
    }
    game.final_map.to_json().hash(&mut hasher);
    hasher.finish()
}

#[test]
fn self_play_is_deterministic() {
    let first = play_to_completion();
    let second = play_to_completion();
    assert_eq!(first.log, second.log, "replay diverged between runs");
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

#[test]
fn replaying_the_log_reproduces_the_final_state() {
    let played = play_to_completion();

    let entries = vec![
        ReplayEntry::Info {
            name: "self-play".to_owned(),
        },
        ReplayEntry::Map {
            map: skirmish_map().to_plain(),
        },
        ReplayEntry::Actions {
            actions: played.log.iter().map(encode_action_response).collect(),
        },
    ];

    let replayed = reconstruct(&entries, None)
        .expect("replay applies")
        .expect("log contains a map");
    assert_eq!(
        replayed.map, played.final_map,
        "live play and replay share one interpreter",
    );
}

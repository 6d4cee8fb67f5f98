#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter: headless self-play simulation, replay
//! inspection, and clipboard save transfer.

mod replay_file;
mod transfer;

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use vanguard_core::{unit_info, Action, ActionResponse, PlayerId};
use vanguard_system_ai::{next_action, AiRegistry};
use vanguard_system_effects::Effects;
use vanguard_system_session::{advance, reconstruct};
use vanguard_world::{unit_display_name, MapData, MapPatch};

use replay_file::load_replay_entries;
use transfer::SaveTransfer;

#[derive(Debug, Parser)]
#[command(name = "vanguard", about = "Vanguard tactics engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Runs an AI-versus-AI game on the given map and prints the log.
    Simulate {
        /// Path to a map snapshot in JSON wire form.
        #[arg(long)]
        map: PathBuf,
        /// Hard round limit applied when the map configures none.
        #[arg(long, default_value_t = 20)]
        rounds: u32,
        /// Seed for scripted-effect draws.
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Reconstructs a replay log and reports its final state.
    Replay {
        /// Path to a replay log (`.vgr` or `.json`).
        #[arg(long)]
        file: PathBuf,
        /// Player whose vision the reconstruction uses.
        #[arg(long)]
        viewer: Option<u8>,
    },
    /// Encodes a map snapshot into a single-line transfer string.
    Export {
        /// Path to a map snapshot in JSON wire form.
        #[arg(long)]
        map: PathBuf,
    },
    /// Decodes a transfer string back into JSON wire form.
    Import {
        /// The transfer string produced by `export`.
        #[arg(long)]
        code: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Simulate { map, rounds, seed } => simulate(&map, rounds, seed),
        Command::Replay { file, viewer } => replay(&file, viewer.map(PlayerId::new)),
        Command::Export { map } => export(&map),
        Command::Import { code } => import(&code),
    }
}

fn simulate(path: &PathBuf, rounds: u32, seed: u64) -> anyhow::Result<()> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read map {}", path.display()))?;
    let mut map = MapData::from_json(&json).map_err(|error| anyhow!("{error}"))?;
    if map.config().round_limit.is_none() {
        let mut config = map.config().clone();
        config.round_limit = Some(rounds);
        map = map.copy(MapPatch {
            config: Some(config),
            ..MapPatch::default()
        });
    }

    let registry = AiRegistry::default();
    let effects = Effects::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut ended = false;
    let start = advance(&map, &effects, &Action::Start, &mut rng)
        .map_err(|error| anyhow!("{error}"))?
        .ok_or_else(|| anyhow!("the game could not be started"))?;
    for response in &start.responses {
        print_response(response);
        ended |= matches!(response, ActionResponse::GameEnd { .. });
    }
    map = start.map;

    while !ended {
        let action = next_action(&map, &registry).map_err(|error| anyhow!("{error}"))?;
        let Some(resolution) = advance(&map, &effects, &action, &mut rng)
            .map_err(|error| anyhow!("{error}"))?
        else {
            return Err(anyhow!("the AI proposed an illegal action"));
        };
        for response in &resolution.responses {
            print_response(response);
            ended |= matches!(response, ActionResponse::GameEnd { .. });
        }
        map = resolution.map;
    }

    info!(round = map.round(), "simulation finished");
    Ok(())
}

fn replay(path: &PathBuf, viewer: Option<PlayerId>) -> anyhow::Result<()> {
    let entries = load_replay_entries(path).map_err(|error| anyhow!("{error}"))?;
    let Some(state) = reconstruct(&entries, viewer).map_err(|error| anyhow!("{error}"))? else {
        return Err(anyhow!("the log contains no map to replay from"));
    };

    println!(
        "round {}, player {} to act, {} units, {} buildings",
        state.map.round(),
        state.map.current_player_id().get(),
        state.map.units().len(),
        state.map.buildings().len(),
    );
    for user in &state.users {
        println!("participant: {}", user.name);
    }
    Ok(())
}

fn export(path: &PathBuf) -> anyhow::Result<()> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read map {}", path.display()))?;
    let map = MapData::from_json(&json).map_err(|error| anyhow!("{error}"))?;
    let transfer = SaveTransfer {
        map: map.to_plain(),
    };
    println!("{}", transfer.encode());
    Ok(())
}

fn import(code: &str) -> anyhow::Result<()> {
    let transfer = SaveTransfer::decode(code).map_err(|error| anyhow!("{error}"))?;
    let map = MapData::from_plain(&transfer.map).map_err(|error| anyhow!("{error}"))?;
    println!("{}", map.to_json());
    Ok(())
}

fn print_response(response: &ActionResponse) {
    match response {
        ActionResponse::Move { from, to, .. } => {
            println!("move ({},{}) -> ({},{})", from.x(), from.y(), to.x(), to.y());
        }
        ActionResponse::AttackUnit {
            from,
            to,
            damage,
            counter_damage,
        } => match counter_damage {
            Some(counter) => println!(
                "attack ({},{}) -> ({},{}) for {damage}, countered for {counter}",
                from.x(),
                from.y(),
                to.x(),
                to.y(),
            ),
            None => println!(
                "attack ({},{}) -> ({},{}) for {damage}",
                from.x(),
                from.y(),
                to.x(),
                to.y(),
            ),
        },
        ActionResponse::UnitDestroyed { at, player } => {
            println!("unit of player {} destroyed at ({},{})", player.get(), at.x(), at.y());
        }
        ActionResponse::CaptureBuilding { at, player } => {
            println!("player {} captured ({},{})", player.get(), at.x(), at.y());
        }
        ActionResponse::CreateUnit {
            at,
            unit_type,
            player,
            name,
            ..
        } => {
            let display = unit_info(*unit_type)
                .zip(*name)
                .and_then(|(info, name)| unit_display_name(info, name))
                .unwrap_or("recruit");
            println!(
                "player {} deployed {display} at ({},{})",
                player.get(),
                at.x(),
                at.y(),
            );
        }
        ActionResponse::EndTurn {
            previous,
            next,
            round,
        } => {
            println!(
                "turn passes from player {} to player {} (round {round})",
                previous.get(),
                next.get(),
            );
        }
        ActionResponse::CharacterMessage { message, .. } => println!("\u{201c}{message}\u{201d}"),
        ActionResponse::GameEnd { winning_team, .. } => match winning_team {
            Some(team) => println!("game over: team {} wins", team.get()),
            None => println!("game over: draw"),
        },
        _ => {}
    }
}

//! # arena_sim: headless match driver
//!
//! Spawns one player and a ring of enemies, installs the gameplay systems and
//! runs the fixed-timestep loop until one side is wiped out or the tick limit
//! is reached.
//!
//! ```text
//! RUST_LOG=arena_game=debug arena_sim --ticks 3600 --seed 7 --snapshot out.json
//! ```

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arena_ecs::{GameEvent, RunOutcome, TickConfig, TickLoop, Topic, World};
use arena_game::combat::unit_query;
use arena_game::components::{Faction, Unit};
use arena_game::systems::InputState;
use arena_game::{ArenaConfig, install_systems, snapshot, spawn_match};

#[derive(Debug, Parser)]
#[command(name = "arena_sim", about = "Run a headless arena match")]
struct Args {
    /// Stop after this many ticks (0 = until one side is wiped out).
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Simulated ticks per second.
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,

    /// Seed for spawn jitter and skill selection.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Override the configured enemy count.
    #[arg(long)]
    enemies: Option<usize>,

    /// JSON tuning file. Defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final render snapshot here as JSON.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Pace ticks against the wall clock.
    #[arg(long)]
    realtime: bool,
}

fn survivors(world: &World, faction: Faction) -> usize {
    world
        .query(&unit_query())
        .into_iter()
        .filter(|&e| world.get_component::<Unit>(e).is_some_and(|u| u.faction == faction))
        .count()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arena_sim=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ArenaConfig::load(path)
            .with_context(|| format!("loading arena config from {}", path.display()))?,
        None => ArenaConfig::default(),
    };
    if let Some(n) = args.enemies {
        config.spawn.enemy_count = n;
    }

    let mut world = World::new();
    let input = Rc::new(Cell::new(InputState::default()));
    install_systems(&mut world, &config, args.seed, input);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let (player, enemies) =
        spawn_match(&mut world, &config.spawn, &mut rng).context("spawning match")?;
    info!(%player, enemies = enemies.len(), seed = args.seed, "arena ready");

    world.on(Topic::UnitDied, |world, event| {
        let GameEvent::UnitDied { unit, killer } = event else {
            return;
        };
        // The dying unit is still in the world while the event is delivered.
        let players = survivors(world, Faction::Player);
        let enemies = survivors(world, Faction::Enemy);
        let dying = world.get_component::<Unit>(*unit).map(|u| u.faction);
        let (players, enemies) = match dying {
            Some(Faction::Player) => (players.saturating_sub(1), enemies),
            Some(Faction::Enemy) => (players, enemies.saturating_sub(1)),
            None => (players, enemies),
        };
        info!(%unit, ?killer, players, enemies, "unit died");
        if players == 0 || enemies == 0 {
            world.request_stop();
        }
    });

    let tick_config = TickConfig {
        tick_rate: args.tick_rate,
        max_ticks: args.ticks,
        realtime: args.realtime,
    };
    let mut tick_loop = TickLoop::new(tick_config, world);
    let outcome = tick_loop.run().context("running match")?;

    let world = tick_loop.into_world();
    let players = survivors(&world, Faction::Player);
    let enemies = survivors(&world, Faction::Enemy);
    let verdict = match (outcome, players, enemies) {
        (RunOutcome::Stopped, 0, _) => "enemies win",
        (RunOutcome::Stopped, _, 0) => "player wins",
        _ => "time limit",
    };
    info!(
        verdict,
        frames = world.frame(),
        elapsed_s = world.elapsed(),
        players,
        enemies,
        "match over"
    );

    if let Some(path) = &args.snapshot {
        let items = snapshot(&world);
        let json = serde_json::to_string_pretty(&items).context("serialising snapshot")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        info!(path = %path.display(), items = items.len(), "snapshot written");
    }
    Ok(())
}

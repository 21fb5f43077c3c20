//! Ouroboros headless driver
//!
//! Runs a scripted loop session on the virtual clock: the hero fights a
//! stream of enemies, uses skills when they are ready, completes a loop
//! every few ticks and restarts on death. Prints a summary at the end.

use clap::Parser;
use ouroboros_sim::core::error::{Result, SimError};
use ouroboros_sim::core::types::{ActorId, Vec2};
use ouroboros_sim::core::GameConfig;
use ouroboros_sim::coordinator::{GameCoordinator, GameState};
use ouroboros_sim::entity::{Actor, Stats};
use ouroboros_sim::events::{CombatOutcome, GameEvent};
use ouroboros_sim::skills::TargetInfo;
use serde::Serialize;
use std::path::PathBuf;

/// Headless Ouroboros session runner
#[derive(Parser, Debug)]
#[command(name = "ouroboros")]
#[command(about = "Run a headless loop session and print a summary")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Milliseconds per frame
    #[arg(long, default_value_t = 16.0)]
    delta_ms: f64,

    /// Game speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Complete a loop every N frames
    #[arg(long, default_value_t = 600)]
    loop_every: u64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct SessionSummary {
    seed: u64,
    ticks: u64,
    runs: u32,
    loops: u32,
    transitions: u32,
    kills: u32,
    deaths: u32,
    flees: u32,
    skills_used: u32,
    damage_dealt: f64,
    final_state: GameState,
    final_level: u32,
    final_gold: u32,
    speed_multiplier: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ouroboros_sim=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let mut game = GameCoordinator::headless(config);
    let mut summary = SessionSummary { seed, runs: 1, ..Default::default() };
    let mut hero = begin_run(&mut game, args.speed)?;

    for tick in 1..=args.ticks {
        let time = tick as f64 * args.delta_ms;

        if game.state() == GameState::Playing {
            engage(&mut game, hero);
            act(&mut game, hero);
        }

        game.update(time, args.delta_ms);

        if args.loop_every > 0 && tick % args.loop_every == 0 {
            game.complete_loop();
        }

        tally(&mut summary, game.drain_events());

        if game.state() == GameState::Defeat {
            summary.loops += game.loop_count();
            summary.transitions += game.transitions();
            game.restart_game();
            hero = begin_run(&mut game, args.speed)?;
            summary.runs += 1;
        }
    }

    summary.ticks = args.ticks;
    summary.loops += game.loop_count();
    summary.transitions += game.transitions();
    summary.final_state = game.state();
    summary.speed_multiplier = game.speed_multiplier();
    if let Some(player) = game.player() {
        summary.final_level = player.stats.level;
        summary.final_gold = player.stats.gold;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn begin_run(game: &mut GameCoordinator, speed: f64) -> Result<ActorId> {
    let Some(hero) = game.start_game(Actor::player("Hero", Stats::default())) else {
        let state = game.state();
        tracing::error!("Cannot start a run from {:?}", state);
        return Err(SimError::StartRejected(format!("coordinator is in {state:?}")));
    };
    game.set_game_speed(speed);
    Ok(hero)
}

/// Make sure the hero has an opponent
fn engage(game: &mut GameCoordinator, hero: ActorId) {
    if game.combat().combat_for(hero).is_some() {
        return;
    }
    let level = 1 + game.loop_count() / 3;
    let Some(position) = game.player().map(|p| p.position + Vec2::new(10.0, 0.0)) else {
        return;
    };

    let mut enemy = Actor::enemy(format!("Slime L{}", level), level, position);
    if level % 5 == 0 {
        enemy = enemy.as_boss();
    }
    let enemy = game.spawn(enemy);
    game.start_combat(hero, enemy);
}

/// Spend ready skills, fleeing when badly hurt
fn act(game: &mut GameCoordinator, hero: ActorId) {
    let Some(combat) = game.combat().combat_for(hero).and_then(|id| game.combat().combat(id).copied()) else {
        return;
    };
    let foe = if combat.attacker == hero { combat.defender } else { combat.attacker };
    let Some((health_ratio, position)) = game
        .player()
        .map(|p| (p.stats.health / p.stats.max_health, p.position))
    else {
        return;
    };

    if health_ratio < 0.5 && game.use_skill("recover", &TargetInfo::none()) {
        return;
    }
    if health_ratio < 0.2 {
        game.attempt_flee(combat.id);
        return;
    }

    let at_foe = TargetInfo::actor(foe);
    let _ = game.use_skill("power_strike", &at_foe)
        || game.use_skill("multi_strike", &TargetInfo::point(position))
        || game.use_skill("quick_strike", &at_foe)
        || game.use_skill("defend", &TargetInfo::none());
}

fn tally(summary: &mut SessionSummary, events: Vec<GameEvent>) {
    for event in events {
        match event {
            GameEvent::DamageDealt { amount, .. } => summary.damage_dealt += f64::from(amount),
            GameEvent::SkillUsed { .. } => summary.skills_used += 1,
            GameEvent::PlayerDied => summary.deaths += 1,
            GameEvent::CombatEnded { outcome: CombatOutcome::Victory, .. } => summary.kills += 1,
            GameEvent::CombatEnded { outcome: CombatOutcome::Fled, .. } => summary.flees += 1,
            _ => {}
        }
    }
}

fn print_summary(summary: &SessionSummary) {
    println!("\n=== OUROBOROS SESSION ===");
    println!("Seed:         {}", summary.seed);
    println!("Ticks:        {}", summary.ticks);
    println!("Runs:         {}", summary.runs);
    println!("Loops:        {} ({} transitions)", summary.loops, summary.transitions);
    println!("Kills:        {}", summary.kills);
    println!("Deaths:       {}", summary.deaths);
    println!("Flees:        {}", summary.flees);
    println!("Skills used:  {}", summary.skills_used);
    println!("Damage dealt: {:.0}", summary.damage_dealt);
    println!("Final state:  {:?}", summary.final_state);
    println!("Final level:  {} ({} gold)", summary.final_level, summary.final_gold);
    println!("Speed:        {:.2}x", summary.speed_multiplier);
}

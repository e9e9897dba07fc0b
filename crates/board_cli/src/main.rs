use anyhow::Result;
use board_core::messages::event_message;
use board_core::{
    CommandEnvelope, Event, EventLevel, GameContent, GameState, GuardedTargets, PilotState,
};
use board_world::{build_initial_state, load_content, load_scenario, scenario_commands};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "board_cli", about = "Headless boarding scenario runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario for a fixed number of ticks.
    Run {
        #[arg(long)]
        ticks: u64,
        /// Overrides the scenario's own seed.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "./content")]
        content_dir: String,
        #[arg(long, default_value = "./content/scenarios/derelict_convoy.json")]
        scenario: String,
        #[arg(long, default_value_t = 10)]
        print_every: u64,
        #[arg(long, default_value = "normal", value_parser = ["normal", "debug"])]
        event_level: String,
    },
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

struct RunArgs {
    ticks: u64,
    seed: Option<u64>,
    content_dir: String,
    scenario: String,
    print_every: u64,
    event_level: EventLevel,
}

fn run(args: RunArgs) -> Result<()> {
    let content = load_content(&args.content_dir)?;
    let scenario = load_scenario(&args.scenario, &content)?;
    let seed = args
        .seed
        .or(scenario.seed)
        .unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = build_initial_state(&content, seed, &scenario);
    let script = scenario_commands(&scenario, &mut state);
    let mut hooks = GuardedTargets {
        targets: scenario.guarded_targets.clone(),
    };

    tracing::info!(scenario = %scenario.name, seed, ticks = args.ticks, "starting run");
    println!(
        "Starting scenario '{}': ticks={} seed={seed} pilots={} content_version={}",
        scenario.name,
        args.ticks,
        state.pilots.len(),
        content.content_version,
    );
    println!("{}", "-".repeat(80));

    for _ in 0..args.ticks {
        let now = state.meta.tick;
        let commands: Vec<CommandEnvelope> = script
            .iter()
            .filter(|envelope| envelope.execute_at_tick == now)
            .cloned()
            .collect();

        let events = board_core::tick(
            &mut state,
            &commands,
            &content,
            &mut hooks,
            &mut rng,
            args.event_level,
        );
        for envelope in &events {
            print_event(now, &envelope.event, &content);
        }

        if state.meta.tick % args.print_every == 0 {
            print_status(&state);
        }
    }

    println!("{}", "-".repeat(80));
    println!("Done. Final state at tick {}:", state.meta.tick);
    print_status(&state);
    Ok(())
}

fn print_event(tick: u64, event: &Event, content: &GameContent) {
    let line = event_message(event, content);
    match event {
        Event::BoardingAnomaly { .. } => eprintln!("[tick={tick:04}] {line}"),
        _ => println!("[tick={tick:04}] {line}"),
    }
}

fn print_status(state: &GameState) {
    let mut pilots: Vec<&PilotState> = state.pilots.values().collect();
    pilots.sort_by(|a, b| a.id.cmp(&b.id));
    let boarding = pilots.iter().filter(|p| p.flags.boarding).count();
    let phase = state
        .player
        .as_ref()
        .map_or("none".to_string(), |player| format!("{:?}", player.session.phase));
    println!(
        "[tick={:04}]  pilots={}  boarding={boarding}  player_session={phase}",
        state.meta.tick,
        pilots.len(),
    );
    for pilot in pilots {
        println!(
            "    {:<16} credits={:>7}  cargo={:>3}/{:<3}  fuel={:>6.1}  armour={:>6.1}{}{}",
            pilot.id.0,
            pilot.credits,
            board_core::pilot::cargo_used(pilot),
            pilot.cargo_capacity,
            pilot.fuel,
            pilot.armour,
            if pilot.flags.disabled { "  [disabled]" } else { "" },
            if pilot.flags.boarded { "  [boarded]" } else { "" },
        );
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            ticks,
            seed,
            content_dir,
            scenario,
            print_every,
            event_level,
        } => {
            let level = match event_level.as_str() {
                "debug" => EventLevel::Debug,
                _ => EventLevel::Normal,
            };
            run(RunArgs {
                ticks,
                seed,
                content_dir,
                scenario,
                print_every: print_every.max(1),
                event_level: level,
            })?;
        }
    }
    Ok(())
}

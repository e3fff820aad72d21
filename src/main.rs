//! Amazons-MCTS: a Game of the Amazons engine.
//!
//! ## Usage
//!
//! - `amazons-mcts` - Run one search from the opening and report it
//! - `amazons-mcts protocol` - Start the text protocol loop on stdin/stdout
//! - `amazons-mcts selfplay` - Let the engine play a full game against itself

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flexi_logger::Logger;
use log::info;

use amazons_mcts::board::Color;
use amazons_mcts::config::{RolloutPolicy, SearchConfig};
use amazons_mcts::constants::{DEFAULT_EXPLORATION, DEFAULT_TIME_MS};
use amazons_mcts::mcts::{advance_root, dump_children, initialize_root, tree_search};
use amazons_mcts::protocol::{ProtocolEngine, format_move};

/// Amazons-MCTS: Monte Carlo Tree Search for the Game of the Amazons
#[derive(Parser)]
#[command(name = "amazons-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    search: SearchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SearchArgs {
    /// Thinking time per move in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIME_MS)]
    time_ms: u64,

    /// UCB1 exploration coefficient
    #[arg(long, global = true, default_value_t = DEFAULT_EXPLORATION)]
    exploration: f64,

    /// Stop each search after this many iterations
    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// How new nodes are scored
    #[arg(long, global = true, value_enum, default_value_t = RolloutPolicy::Heuristic)]
    rollout: RolloutPolicy,

    /// Seed for the search's random number generator
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        let config = SearchConfig::default()
            .with_time_ms(self.time_ms)
            .with_exploration(self.exploration)
            .with_rollout(self.rollout);
        match self.iterations {
            Some(n) => config.with_max_iterations(n),
            None => config,
        }
    }

    fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol loop for use with a game server bridge or GUI
    Protocol,
    /// Play a full game of the engine against itself
    Selfplay,
    /// Run a single search from the opening position
    Demo,
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")
        .context("invalid log specification")?
        .start()
        .context("failed to start logger")?;

    let cli = Cli::parse();
    let config = cli.search.config();
    let mut rng = cli.search.rng();

    match cli.command {
        Some(Commands::Protocol) => {
            let mut engine = ProtocolEngine::new(config, rng);
            engine.run().context("protocol loop failed")?;
        }
        Some(Commands::Selfplay) => run_selfplay(&config, &mut rng),
        Some(Commands::Demo) | None => run_demo(&config, &mut rng),
    }
    Ok(())
}

fn run_demo(config: &SearchConfig, rng: &mut fastrand::Rng) {
    println!("Amazons-MCTS: Game of the Amazons engine\n");

    let mut root = initialize_root(Color::Black);
    println!("{}", root.state.board);

    let result = tree_search(&mut root, config, rng);
    dump_children(&root);
    match result.best {
        Some(mv) => println!("Best move: {}", format_move(&mv)),
        None => println!("No legal move"),
    }
    println!(
        "Iterations: {}  max depth: {}  elapsed: {:?}",
        result.stats.iterations, result.stats.max_depth, result.stats.elapsed
    );
}

fn run_selfplay(config: &SearchConfig, rng: &mut fastrand::Rng) {
    let mut root = initialize_root(Color::Black);
    let mut ply = 0;

    loop {
        let mover = root.color;
        let Some(mv) = tree_search(&mut root, config, rng).best else {
            println!("{mover} has no legal move: {} wins after {ply} plies", mover.opposite());
            break;
        };
        ply += 1;
        println!("{ply:3}. {mover}: {}", format_move(&mv));
        root = advance_root(root, &mv);
        info!("tree reused with {} visits", root.visits);
    }
    println!("\n{}", root.state.board);
}

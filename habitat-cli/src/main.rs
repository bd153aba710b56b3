//! Habitat terminal front end
//!
//! Lists and generates maps, and plays a game from stdin commands.
//! Logs go to stderr so stdout stays the game transcript.

mod play;
mod render;
mod store;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use habitat_core::names::{self, DEFAULT_PLAYER_NAME};
use habitat_core::{GameConfig, Grid, MapRecord, MapStore, MemoryMapStore, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use crate::play::{Game, NameBounds};
use crate::store::FileMapStore;

#[derive(Debug, Parser)]
#[command(author, version, about = "Place animals, score points, survive the turns")]
struct Cli {
    /// YAML game config (defaults reproduce the reference game)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "habitat_core=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available map names
    Maps {
        /// JSON file of map records to use instead of the built-in maps
        #[arg(long)]
        maps: Option<PathBuf>,
    },
    /// Generate a random map and print it as a JSON record
    NewMap {
        /// Map name (random when omitted)
        #[arg(long)]
        name: Option<String>,
        /// RNG seed for a reproducible map
        #[arg(long)]
        seed: Option<u64>,
        /// Also save the map into this JSON file, creating it if needed
        #[arg(long)]
        maps: Option<PathBuf>,
    },
    /// Play a game reading commands from stdin
    Play {
        /// Map to play on (a random map when omitted)
        #[arg(long)]
        map: Option<String>,
        /// Player name
        #[arg(long, conflicts_with = "random_player")]
        player: Option<String>,
        /// Use a generated player name
        #[arg(long)]
        random_player: bool,
        /// JSON file of map records to use instead of the built-in maps
        #[arg(long)]
        maps: Option<PathBuf>,
        /// RNG seed for random maps and names
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// The maps file when given, otherwise the built-in maps.
fn open_store(path: Option<&Path>, size: usize) -> Result<Box<dyn MapStore>> {
    match path {
        Some(path) => {
            let store = FileMapStore::open(path, size)
                .with_context(|| format!("failed to open maps {}", path.display()))?;
            Ok(Box::new(store))
        }
        None => {
            let store = MemoryMapStore::with_builtin_maps();
            if store.size() != size {
                bail!(
                    "built-in maps are {0}x{0} but grid_size is {1}; pass --maps",
                    store.size(),
                    size
                );
            }
            Ok(Box::new(store))
        }
    }
}

fn list_maps(config: &GameConfig, maps: Option<&Path>) -> Result<()> {
    let store = open_store(maps, config.grid_size)?;
    for name in store.list_map_names()? {
        println!("{name}");
    }
    Ok(())
}

fn new_map(
    config: &GameConfig,
    name: Option<String>,
    seed: Option<u64>,
    maps: Option<&Path>,
) -> Result<()> {
    let mut rng = make_rng(seed);
    let name = name.unwrap_or_else(|| names::random_map_name(&mut rng));
    let grid = Grid::random(name, config.grid_size, &mut rng);

    if let Some(path) = maps {
        FileMapStore::open(path, config.grid_size)
            .and_then(|mut store| store.save_map(&grid))
            .with_context(|| format!("failed to save map {} to {}", grid.name(), path.display()))?;
    }

    println!("{}", serde_json::to_string_pretty(&MapRecord::from(&grid))?);
    eprintln!("{}", render::grid(&grid));
    Ok(())
}

fn play(
    config: GameConfig,
    map: Option<String>,
    player: Option<String>,
    random_player: bool,
    maps: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = make_rng(seed);
    let grid = match map {
        Some(name) => open_store(maps, config.grid_size)?
            .load_map(&name)
            .with_context(|| format!("failed to load map {name}"))?,
        None => Grid::random(names::random_map_name(&mut rng), config.grid_size, &mut rng),
    };

    let player = match player {
        Some(player) => {
            names::validate_player_name(
                &player,
                config.min_player_name_len,
                config.max_player_name_len,
            )?;
            player
        }
        None if random_player => names::random_player_name(&mut rng),
        None => DEFAULT_PLAYER_NAME.to_string(),
    };

    let bounds = NameBounds {
        min: config.min_player_name_len,
        max: config.max_player_name_len,
    };
    let mut session = Session::new(config)?;
    session.new_game(&player, grid)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Game::new(&mut session, bounds, stdout.lock()).run(stdin.lock())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Maps { maps } => list_maps(&config, maps.as_deref()),
        Command::NewMap { name, seed, maps } => new_map(&config, name, seed, maps.as_deref()),
        Command::Play {
            map,
            player,
            random_player,
            maps,
            seed,
        } => play(config, map, player, random_player, maps.as_deref(), seed),
    }
}

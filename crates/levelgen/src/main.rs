//! Level layout generator
//!
//! Generates one dungeon from command-line parameters and prints its map,
//! a summary and the validation report, or the whole result as JSON.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use levelgen_core::dungeon::{DungeonResult, RoomType, TileMap};
use levelgen_core::{DungeonConfig, DungeonGenerator, Generation, StartCriteria, ValidationReport};

/// Procedural dungeon layout generator
#[derive(Parser, Debug)]
#[command(name = "levelgen")]
#[command(author, version, about = "Generate a BSP dungeon layout", long_about = None)]
struct Args {
    /// Seed (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Region width in cells
    #[arg(short = 'W', long = "width", default_value_t = 80)]
    width: u32,

    /// Region height in cells
    #[arg(short = 'H', long = "height", default_value_t = 40)]
    height: u32,

    /// Minimum room side
    #[arg(long = "min-room", default_value_t = 6)]
    min_room: u32,

    /// Maximum room side
    #[arg(long = "max-room", default_value_t = 15)]
    max_room: u32,

    /// Corridor width in cells
    #[arg(long = "corridor-width", default_value_t = 1)]
    corridor_width: u32,

    /// Minimum doors on the starting room
    #[arg(long = "min-connections", default_value_t = 1)]
    min_connections: u32,

    /// Minimum floor area of the starting room
    #[arg(long = "min-area", default_value_t = 0.0)]
    min_area: f64,

    /// Do not prefer starting rooms near the map edge
    #[arg(long = "no-edge")]
    no_edge: bool,

    /// Pick the entrance by distance instead of facing the map edge
    #[arg(long = "no-exterior-entrance")]
    no_exterior_entrance: bool,

    /// Regenerate with derived seeds until the dungeon validates
    #[arg(short = 'r', long = "retry")]
    retry: bool,

    /// Print the result as JSON instead of a map
    #[arg(long = "json")]
    json: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn config(&self) -> DungeonConfig {
        DungeonConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            width: self.width,
            height: self.height,
            min_room_size: self.min_room,
            max_room_size: self.max_room,
            corridor_width: self.corridor_width,
            ..DungeonConfig::default()
        }
    }

    fn criteria(&self) -> StartCriteria {
        StartCriteria {
            prefer_map_edge: !self.no_edge,
            create_exterior_entrance: !self.no_exterior_entrance,
            min_room_area: self.min_area,
            min_connections: self.min_connections,
            ..StartCriteria::default()
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    config: &'a DungeonConfig,
    dungeon: &'a DungeonResult,
    report: &'a ValidationReport,
    attempts: u32,
}

fn print_summary(generation: &Generation) {
    let dungeon = &generation.dungeon;
    let report = &generation.validation;

    print!("{}", TileMap::from_dungeon(dungeon).render());
    println!();
    println!(
        "seed {}  {}x{}  rooms {}  doors {}  corridors {}  attempts {}",
        dungeon.seed(),
        dungeon.width(),
        dungeon.height(),
        dungeon.rooms().len(),
        dungeon.doors().len(),
        dungeon.corridors().len(),
        generation.attempts,
    );

    for (room_type, ids) in dungeon.rooms_by_type() {
        println!("  {room_type:<12} {}", ids.len());
    }
    if let Some(start) = dungeon.starting_room() {
        println!("start {} at ({}, {})", start.id, start.center.x, start.center.y);
    }
    if let Some(door) = dungeon.entrance_door() {
        println!(
            "entrance {} at ({}, {}) facing {}",
            door.id, door.position.x, door.position.y, door.side
        );
    }
    let deepest = dungeon
        .rooms()
        .iter()
        .filter_map(|r| r.distance_from_start)
        .max()
        .unwrap_or(0);
    println!(
        "max distance {deepest}  boss rooms {}",
        dungeon.rooms_of_type(RoomType::Boss).len()
    );

    println!(
        "valid {}  completability {:.2}  balance {:.2}",
        report.is_valid, report.completability_score, report.balance_score
    );
    for e in &report.errors {
        println!("error: {e}");
    }
    for w in &report.warnings {
        println!("warning: {w}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.config();
    debug!(?config, "parsed arguments");

    let generator = match DungeonGenerator::new(config, args.criteria()) {
        Ok(generator) => generator,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = if args.retry {
        generator.generate_until_valid()
    } else {
        generator.generate()
    };
    let generation = match result {
        Ok(generation) => generation,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        let output = JsonOutput {
            config: generator.config(),
            dungeon: &generation.dungeon,
            report: &generation.validation,
            attempts: generation.attempts,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("failed to serialize dungeon: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&generation);
    }

    if generation.validation.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_to_config() {
        let args = Args::parse_from([
            "levelgen",
            "--seed",
            "7",
            "-W",
            "60",
            "--min-connections",
            "2",
            "--no-edge",
        ]);
        let config = args.config();
        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 60);
        assert_eq!(config.height, 40);

        let criteria = args.criteria();
        assert!(!criteria.prefer_map_edge);
        assert!(criteria.create_exterior_entrance);
        assert_eq!(criteria.min_connections, 2);
    }

    #[test]
    fn test_json_output_shape() {
        let args = Args::parse_from(["levelgen", "--seed", "3"]);
        let generator = DungeonGenerator::new(args.config(), args.criteria()).unwrap();
        let generation = generator.generate().unwrap();
        let output = JsonOutput {
            config: generator.config(),
            dungeon: &generation.dungeon,
            report: &generation.validation,
            attempts: generation.attempts,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["config"]["seed"], serde_json::json!(3));
        assert!(value["dungeon"]["rooms"].is_array());
        assert!(value["report"]["is_valid"].is_boolean());
    }
}

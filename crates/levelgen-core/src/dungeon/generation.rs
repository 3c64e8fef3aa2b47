//! Generation pipeline
//!
//! Runs the phases in their fixed order with one seeded generator per run:
//! partition, place rooms, connect, select the start, label progression,
//! validate. Each phase is also a public free function, so a driver that
//! wants to interleave other work between phases can call them directly.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{DungeonConfig, StartCriteria};
use crate::consts::ATTEMPT_SEED_STRIDE;
use crate::error::{ConfigError, GenerationError};
use crate::rng::GenRng;

use super::corridor::{Connections, connect_rooms};
use super::partition::partition;
use super::placement::place_rooms;
use super::progression::label_progression;
use super::rect::Rect;
use super::result::DungeonResult;
use super::start::select_starting_room;
use super::validation::{ValidationReport, validate};

/// A generated dungeon together with its validation report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub dungeon: DungeonResult,
    pub validation: ValidationReport,
    /// Runs made to produce this dungeon
    pub attempts: u32,
}

/// Seed used by attempt `attempt` of a bounded retry; attempt 0 keeps `seed`
pub fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    seed.wrapping_add(u64::from(attempt).wrapping_mul(ATTEMPT_SEED_STRIDE))
}

/// Validated configuration and start criteria, ready to generate
#[derive(Debug, Clone, PartialEq)]
pub struct DungeonGenerator {
    config: DungeonConfig,
    criteria: StartCriteria,
}

impl DungeonGenerator {
    /// Fails fast on invalid input; nothing is generated
    pub fn new(config: DungeonConfig, criteria: StartCriteria) -> Result<Self, ConfigError> {
        config.validate()?;
        criteria.validate()?;
        Ok(Self { config, criteria })
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn criteria(&self) -> &StartCriteria {
        &self.criteria
    }

    /// One run with the configured seed
    ///
    /// The dungeon is returned even when validation fails; inspect
    /// `validation.is_valid`.
    pub fn generate(&self) -> Result<Generation, GenerationError> {
        self.generate_with_seed(self.config.seed)
    }

    /// One run with an explicit seed
    pub fn generate_with_seed(&self, seed: u64) -> Result<Generation, GenerationError> {
        let width = self.config.width;
        let height = self.config.height;
        let region = Rect::from_size(0, 0, width as i32, height as i32);
        let mut rng = GenRng::new(seed);

        let mut tree = partition(region, &self.config, &mut rng);
        let mut rooms = place_rooms(&mut tree, &self.config, &mut rng);
        let Connections {
            mut doors,
            corridors,
            ..
        } = connect_rooms(&tree, &mut rooms, region, &self.config, &mut rng);

        let selection = select_starting_room(&mut rooms, &self.criteria, width, height)?;
        label_progression(
            &mut rooms,
            &mut doors,
            &corridors,
            selection.room,
            &self.criteria,
            &region,
        );

        let dungeon = DungeonResult::new(
            width,
            height,
            seed,
            rooms,
            doors,
            corridors,
            Some(selection.room),
        );
        let mut validation = validate(&dungeon);
        validation.warnings.extend(selection.warnings());

        info!(
            seed,
            rooms = dungeon.rooms().len(),
            doors = dungeon.doors().len(),
            valid = validation.is_valid,
            "generated dungeon"
        );

        Ok(Generation {
            dungeon,
            validation,
            attempts: 1,
        })
    }

    /// Regenerate with derived seeds until a run validates, at most
    /// `max_attempts` times
    pub fn generate_until_valid(&self) -> Result<Generation, GenerationError> {
        let attempts = self.config.max_attempts;
        let mut errors = Vec::new();

        for attempt in 0..attempts {
            let seed = attempt_seed(self.config.seed, attempt);
            let mut generation = self.generate_with_seed(seed)?;
            if generation.validation.is_valid {
                generation.attempts = attempt + 1;
                return Ok(generation);
            }

            warn!(
                attempt,
                seed,
                errors = ?generation.validation.errors,
                "dungeon failed validation, retrying"
            );
            errors.push(format!(
                "seed {seed}: {}",
                generation.validation.errors.join(", ")
            ));
        }

        Err(GenerationError::AttemptsExhausted { attempts, errors })
    }
}

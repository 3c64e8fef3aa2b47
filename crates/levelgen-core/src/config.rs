//! Caller-supplied generation parameters
//!
//! [`DungeonConfig`] shapes the region and its rooms; [`StartCriteria`]
//! steers the choice of the starting room. Both are immutable for the
//! duration of a run and are checked up front.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_LOOP_CHANCE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DEPTH, MAX_REGION_SIZE, MAX_TREE_DEPTH,
};
use crate::error::ConfigError;

/// Region, room and corridor parameters for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub min_room_size: u32,
    pub max_room_size: u32,
    pub corridor_width: u32,
    pub treasure_room_chance: f64,
    pub guard_room_chance: f64,
    pub laboratory_chance: f64,
    pub boss_room_chance: f64,
    /// Recursion cap for the partition tree
    pub max_depth: u32,
    /// Probability per internal partition node of an extra loop corridor
    pub loop_chance: f64,
    /// Bound for [`crate::DungeonGenerator::generate_until_valid`]
    pub max_attempts: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 80,
            height: 80,
            min_room_size: 6,
            max_room_size: 15,
            corridor_width: 1,
            treasure_room_chance: 0.10,
            guard_room_chance: 0.10,
            laboratory_chance: 0.05,
            boss_room_chance: 0.05,
            max_depth: DEFAULT_MAX_DEPTH,
            loop_chance: DEFAULT_LOOP_CHANCE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl DungeonConfig {
    /// Default configuration for a `width × height` region
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Same configuration with another seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sum of the special room type chances
    pub fn special_chance_total(&self) -> f64 {
        self.treasure_room_chance
            + self.guard_room_chance
            + self.laboratory_chance
            + self.boss_room_chance
    }

    /// Check every field, failing on the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("min_room_size", self.min_room_size),
            ("max_room_size", self.max_room_size),
            ("corridor_width", self.corridor_width),
            ("max_depth", self.max_depth),
            ("max_attempts", self.max_attempts),
        ] {
            if value == 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value > MAX_REGION_SIZE {
                return Err(ConfigError::RegionTooLarge {
                    field,
                    value,
                    max: MAX_REGION_SIZE,
                });
            }
        }

        if self.max_depth > MAX_TREE_DEPTH {
            return Err(ConfigError::DepthTooLarge {
                value: self.max_depth,
                max: MAX_TREE_DEPTH,
            });
        }

        if self.min_room_size > self.max_room_size {
            return Err(ConfigError::RoomSizeRange {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }

        for (field, value) in [
            ("treasure_room_chance", self.treasure_room_chance),
            ("guard_room_chance", self.guard_room_chance),
            ("laboratory_chance", self.laboratory_chance),
            ("boss_room_chance", self.boss_room_chance),
            ("loop_chance", self.loop_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ChanceOutOfRange { field, value });
            }
        }

        let total = self.special_chance_total();
        if total > 1.0 + f64::EPSILON {
            return Err(ConfigError::ChanceSumExceedsOne(total));
        }

        Ok(())
    }
}

/// Constraints and preferences for picking the starting room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartCriteria {
    pub prefer_map_edge: bool,
    pub create_exterior_entrance: bool,
    pub edge_preference_strength: f64,
    pub min_room_area: f64,
    pub min_connections: u32,
    pub corner_avoidance_radius: f64,
}

impl Default for StartCriteria {
    fn default() -> Self {
        Self {
            prefer_map_edge: true,
            create_exterior_entrance: true,
            edge_preference_strength: 1.0,
            min_room_area: 0.0,
            min_connections: 1,
            corner_avoidance_radius: 0.0,
        }
    }
}

impl StartCriteria {
    /// Check the numeric fields are finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("edge_preference_strength", self.edge_preference_strength),
            ("min_room_area", self.min_room_area),
            ("corner_avoidance_radius", self.corner_avoidance_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidCriteria { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DungeonConfig::default().validate().is_ok());
        assert!(StartCriteria::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let config = DungeonConfig::with_size(0, 40);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "width",
                value: 0
            })
        );

        let config = DungeonConfig {
            corridor_width: 0,
            ..DungeonConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "corridor_width",
                ..
            })
        ));
    }

    #[test]
    fn test_region_cap() {
        let config = DungeonConfig::with_size(MAX_REGION_SIZE + 1, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RegionTooLarge { field: "width", .. })
        ));
    }

    #[test]
    fn test_depth_cap() {
        let config = DungeonConfig {
            max_depth: MAX_TREE_DEPTH,
            ..DungeonConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = DungeonConfig {
            max_depth: 16,
            ..DungeonConfig::with_size(1024, 1024)
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DepthTooLarge {
                value: 16,
                max: MAX_TREE_DEPTH
            })
        );
    }

    #[test]
    fn test_room_size_range() {
        let config = DungeonConfig {
            min_room_size: 10,
            max_room_size: 5,
            ..DungeonConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RoomSizeRange { min: 10, max: 5 })
        );
    }

    #[test]
    fn test_chances() {
        let config = DungeonConfig {
            boss_room_chance: 1.5,
            ..DungeonConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ChanceOutOfRange {
                field: "boss_room_chance",
                ..
            })
        ));

        let config = DungeonConfig {
            treasure_room_chance: 0.5,
            guard_room_chance: 0.4,
            laboratory_chance: 0.3,
            boss_room_chance: 0.0,
            ..DungeonConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ChanceSumExceedsOne(_))
        ));

        let config = DungeonConfig {
            loop_chance: f64::NAN,
            ..DungeonConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_criteria_rejects_negative_and_nan() {
        let criteria = StartCriteria {
            min_room_area: -1.0,
            ..StartCriteria::default()
        };
        assert!(matches!(
            criteria.validate(),
            Err(ConfigError::InvalidCriteria {
                field: "min_room_area",
                ..
            })
        ));

        let criteria = StartCriteria {
            corner_avoidance_radius: f64::INFINITY,
            ..StartCriteria::default()
        };
        assert!(criteria.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DungeonConfig =
            serde_json::from_str(r#"{"seed": 42, "width": 30, "height": 20}"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.width, 30);
        assert_eq!(config.min_room_size, 6);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}

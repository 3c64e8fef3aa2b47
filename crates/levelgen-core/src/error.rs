//! Error types for configuration and generation

use thiserror::Error;

/// Rejected configuration or start criteria
///
/// Raised before any generation step runs; no partial dungeon exists when
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: u32 },

    #[error("{field} = {value} exceeds the maximum region size of {max}")]
    RegionTooLarge {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("max_depth = {value} exceeds the limit of {max}")]
    DepthTooLarge { value: u32, max: u32 },

    #[error("min_room_size ({min}) is larger than max_room_size ({max})")]
    RoomSizeRange { min: u32, max: u32 },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    ChanceOutOfRange { field: &'static str, value: f64 },

    #[error("room type chances sum to {0}, which exceeds 1")]
    ChanceSumExceedsOne(f64),

    #[error("start criteria field {field} is invalid: {value}")]
    InvalidCriteria { field: &'static str, value: f64 },
}

/// Failure of a generation request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no candidate room for the starting point")]
    NoCandidate,

    #[error("no valid dungeon after {attempts} attempts: {}", errors.join("; "))]
    AttemptsExhausted { attempts: u32, errors: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConfigError::NonPositive {
            field: "width",
            value: 0,
        };
        assert_eq!(err.to_string(), "width must be positive, got 0");

        let err: GenerationError = ConfigError::RoomSizeRange { min: 9, max: 4 }.into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: min_room_size (9) is larger than max_room_size (4)"
        );

        let err = GenerationError::AttemptsExhausted {
            attempts: 2,
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "no valid dungeon after 2 attempts: a; b");
    }
}

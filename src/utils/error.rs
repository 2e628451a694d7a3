use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventedError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid speed range [{min}, {max}): {reason}")]
    InvalidSpeedRange { min: u32, max: u32, reason: String },

    #[error("Unknown vehicle kind: {name}")]
    UnknownVehicleKind { name: String },

    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    #[error("Race did not finish within {laps} laps ({finished}/{total} vehicles finished)")]
    LapLimitExceeded {
        laps: u64,
        finished: usize,
        total: usize,
    },
}

impl EventedError {
    /// 針對錯誤給出簡短的修正建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EventedError::IoError(_) => "Check that the file exists and is readable",
            EventedError::SerializationError(_) => "Try again without --json",
            EventedError::TomlError(_) => "Make sure the file is valid TOML format",
            EventedError::ConfigValidationError { .. }
            | EventedError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            EventedError::InvalidSpeedRange { .. } => {
                "Speed ranges need a minimum of at least 1 and a maximum above the minimum"
            }
            EventedError::UnknownVehicleKind { .. } => {
                "Use one of: sports_car, passenger_car, truck, bus"
            }
            EventedError::UnknownOperation { .. } => {
                "Use one of: add, subtract, multiply, divide"
            }
            EventedError::LapLimitExceeded { .. } => {
                "Raise race.max_laps or lower race.finish_line"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EventedError>;

use crate::utils::error::{EventedError, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 預設終點線距離
pub const DEFAULT_FINISH_LINE: u32 = 100;

/// Half-open speed range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRange {
    min: u32,
    max: u32,
}

impl SpeedRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min == 0 {
            return Err(EventedError::InvalidSpeedRange {
                min,
                max,
                reason: "minimum speed must be at least 1".to_string(),
            });
        }
        if min >= max {
            return Err(EventedError::InvalidSpeedRange {
                min,
                max,
                reason: "range is empty".to_string(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    /// Exclusive upper bound.
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, speed: u32) -> bool {
        (self.min..self.max).contains(&speed)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    SportsCar,
    PassengerCar,
    Truck,
    Bus,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 4] = [
        VehicleKind::SportsCar,
        VehicleKind::PassengerCar,
        VehicleKind::Truck,
        VehicleKind::Bus,
    ];

    pub fn speed_range(self) -> SpeedRange {
        // 常數範圍皆非空且下限 >= 1
        let (min, max) = match self {
            VehicleKind::SportsCar => (10, 20),
            VehicleKind::PassengerCar => (8, 15),
            VehicleKind::Truck => (5, 12),
            VehicleKind::Bus => (4, 10),
        };
        SpeedRange { min, max }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleKind::SportsCar => "sports_car",
            VehicleKind::PassengerCar => "passenger_car",
            VehicleKind::Truck => "truck",
            VehicleKind::Bus => "bus",
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleKind {
    type Err = EventedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(&['-', ' '][..], "_").as_str() {
            "sports_car" | "sportscar" | "sports" => Ok(VehicleKind::SportsCar),
            "passenger_car" | "passengercar" | "passenger" | "car" => {
                Ok(VehicleKind::PassengerCar)
            }
            "truck" => Ok(VehicleKind::Truck),
            "bus" => Ok(VehicleKind::Bus),
            _ => Err(EventedError::UnknownVehicleKind {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleState {
    Running,
    Finished,
}

/// Result of a single `Vehicle::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    /// This step crossed the finish line.
    Finished,
    /// Already finished; nothing changed.
    Idle,
}

/// What happened during one lap of a race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapReport {
    pub lap: u64,
    pub finished: Vec<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub place: usize,
    pub model: String,
    pub kind: VehicleKind,
    pub speed: u32,
    pub lap: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceOutcome {
    Completed,
    Cancelled,
    LapLimitReached,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSummary {
    pub outcome: RaceOutcome,
    pub laps: u64,
    pub standings: Vec<Standing>,
    pub unfinished: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl RaceSummary {
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }
}

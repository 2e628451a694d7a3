pub mod engine;
pub mod event;
pub mod operation;
pub mod property;
pub mod race;
pub mod vehicle;

pub use crate::domain::model::{
    LapReport, RaceOutcome, RaceSummary, SpeedRange, Standing, StepOutcome, VehicleKind,
    VehicleState,
};
pub use crate::domain::ports::{PropertyNotifier, Simulation};
pub use crate::utils::error::Result;

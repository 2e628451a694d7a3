pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliArgs, Command};

pub use config::toml_config::DemoConfig;
pub use crate::core::{
    engine::{stop_channel, RaceEngine, StopHandle, StopSignal},
    event::{Event, SubscriptionId},
    operation::{calculator, Operation, OperationDispatcher, OperationKind},
    property::{NamedProperty, Profile, PropertyChanged},
    race::{Race, RaceRun},
    vehicle::Vehicle,
};
pub use domain::model::{
    LapReport, RaceOutcome, RaceSummary, SpeedRange, Standing, StepOutcome, VehicleKind,
    VehicleState,
};
pub use domain::ports::{PropertyNotifier, Simulation};
pub use utils::error::{EventedError, Result};

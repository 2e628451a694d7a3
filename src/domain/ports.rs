use crate::core::event::Event;
use crate::core::property::PropertyChanged;
use crate::domain::model::{LapReport, RaceOutcome, RaceSummary};

/// Anything that announces property changes through an event.
pub trait PropertyNotifier {
    fn property_changed(&self) -> &Event<PropertyChanged>;
}

/// A lap-by-lap simulation that an engine can drive to completion.
pub trait Simulation: Send {
    fn step_lap(&mut self) -> LapReport;
    fn is_complete(&self) -> bool;
    fn laps(&self) -> u64;
    fn summary(&self, outcome: RaceOutcome) -> RaceSummary;
}

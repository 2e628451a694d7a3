use crate::core::event::{Event, SubscriptionId};
use crate::core::vehicle::Vehicle;
use crate::domain::model::{LapReport, RaceOutcome, RaceSummary, Standing, StepOutcome};
use crate::domain::ports::Simulation;
use crate::utils::error::{EventedError, Result};
use chrono::{DateTime, Utc};

/// Race orchestrator: owns the start/finish events and relays vehicle finishes.
#[derive(Debug, Default)]
pub struct Race {
    started: Event<()>,
    finished: Event<String>,
}

impl Race {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.started.subscribe(move |_| handler())
    }

    pub fn on_finish<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&String) + Send + Sync + 'static,
    {
        self.finished.subscribe(handler)
    }

    /// Forwards `vehicle`'s finish message, unchanged, as this race's finish notification.
    /// The returned id belongs to the vehicle's finish event.
    pub fn subscribe(&self, vehicle: &Vehicle) -> SubscriptionId {
        let relay = self.finished.clone();
        vehicle.on_finish(move |message| {
            relay.publish(message);
        })
    }

    /// Announces the start and hands the stepping loop back to the caller.
    pub fn start(&self, vehicles: Vec<Vehicle>) -> RaceRun {
        tracing::info!("🚦 Race starting with {} vehicle(s)", vehicles.len());
        self.started.publish(&());
        RaceRun::new(vehicles)
    }
}

/// A race in progress. Each `step_lap` advances every vehicle once, in order.
#[derive(Debug)]
pub struct RaceRun {
    vehicles: Vec<Vehicle>,
    lap: u64,
    standings: Vec<Standing>,
    started_at: DateTime<Utc>,
}

impl RaceRun {
    fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles,
            lap: 0,
            standings: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn lap(&self) -> u64 {
        self.lap
    }

    /// 完賽順序，依抵達終點的圈數與出發順序排列
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn is_complete(&self) -> bool {
        self.vehicles.iter().all(Vehicle::is_finished)
    }

    /// A complete race does not count further laps.
    pub fn step_lap(&mut self) -> LapReport {
        if self.is_complete() {
            return LapReport {
                lap: self.lap,
                finished: Vec::new(),
                complete: true,
            };
        }

        self.lap += 1;
        let mut finished = Vec::new();
        for vehicle in &mut self.vehicles {
            if vehicle.step() == StepOutcome::Finished {
                self.standings.push(Standing {
                    place: self.standings.len() + 1,
                    model: vehicle.model().to_string(),
                    kind: vehicle.kind(),
                    speed: vehicle.speed(),
                    lap: self.lap,
                });
                finished.push(vehicle.model().to_string());
            }
        }

        let complete = self.is_complete();
        tracing::debug!("Lap {}: {} finished, complete={}", self.lap, finished.len(), complete);
        LapReport {
            lap: self.lap,
            finished,
            complete,
        }
    }

    /// Steps until every vehicle has finished, or fails once `max_laps` laps have run.
    pub fn run_to_completion(&mut self, max_laps: u64) -> Result<RaceSummary> {
        while !self.is_complete() {
            if self.lap >= max_laps {
                tracing::warn!(
                    "⚠️ Lap limit {} reached before all vehicles finished",
                    max_laps
                );
                return Err(EventedError::LapLimitExceeded {
                    laps: self.lap,
                    finished: self.standings.len(),
                    total: self.vehicles.len(),
                });
            }
            self.step_lap();
        }

        tracing::info!("🏆 Race complete after {} lap(s)", self.lap);
        Ok(self.summary(RaceOutcome::Completed))
    }

    pub fn summary(&self, outcome: RaceOutcome) -> RaceSummary {
        RaceSummary {
            outcome,
            laps: self.lap,
            standings: self.standings.clone(),
            unfinished: self
                .vehicles
                .iter()
                .filter(|v| !v.is_finished())
                .map(|v| v.model().to_string())
                .collect(),
            started_at: self.started_at,
            ended_at: Utc::now(),
        }
    }
}

impl Simulation for RaceRun {
    fn step_lap(&mut self) -> LapReport {
        RaceRun::step_lap(self)
    }

    fn is_complete(&self) -> bool {
        RaceRun::is_complete(self)
    }

    fn laps(&self) -> u64 {
        self.lap
    }

    fn summary(&self, outcome: RaceOutcome) -> RaceSummary {
        RaceRun::summary(self, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::VehicleKind;
    use std::sync::{Arc, Mutex};

    fn field() -> Vec<Vehicle> {
        vec![
            Vehicle::with_speed("Ferrari", VehicleKind::SportsCar, 20),
            Vehicle::with_speed("Toyota", VehicleKind::PassengerCar, 10),
            Vehicle::with_speed("Ikarus", VehicleKind::Bus, 25),
        ]
    }

    #[test]
    fn test_start_notifies_observers() {
        let race = Race::new();
        let starts = Arc::new(Mutex::new(0));
        {
            let starts = Arc::clone(&starts);
            race.on_start(move || *starts.lock().unwrap() += 1);
        }

        let run = race.start(field());

        assert_eq!(*starts.lock().unwrap(), 1);
        assert_eq!(run.lap(), 0);
        assert_eq!(run.vehicles().len(), 3);
    }

    #[test]
    fn test_relay_forwards_each_finish_once() {
        let race = Race::new();
        let messages = Arc::new(Mutex::new(Vec::new()));
        {
            let messages = Arc::clone(&messages);
            race.on_finish(move |msg| messages.lock().unwrap().push(msg.clone()));
        }

        let vehicles = field();
        for vehicle in &vehicles {
            race.subscribe(vehicle);
        }
        let mut run = race.start(vehicles);
        let summary = run.run_to_completion(100).unwrap();

        // Ikarus: 4 圈; Ferrari: 5 圈; Toyota: 10 圈
        assert_eq!(
            *messages.lock().unwrap(),
            vec!["Ikarus finished!", "Ferrari finished!", "Toyota finished!"]
        );
        assert_eq!(summary.outcome, RaceOutcome::Completed);
        assert_eq!(summary.laps, 10);
        assert!(summary.unfinished.is_empty());
        assert_eq!(summary.winner().unwrap().model, "Ikarus");
        let laps: Vec<u64> = summary.standings.iter().map(|s| s.lap).collect();
        assert_eq!(laps, vec![4, 5, 10]);
    }

    #[test]
    fn test_unsubscribed_vehicle_is_not_relayed() {
        let race = Race::new();
        let messages = Arc::new(Mutex::new(Vec::new()));
        {
            let messages = Arc::clone(&messages);
            race.on_finish(move |msg| messages.lock().unwrap().push(msg.clone()));
        }

        let vehicles = field();
        race.subscribe(&vehicles[0]);
        let mut run = race.start(vehicles);
        run.run_to_completion(100).unwrap();

        assert_eq!(*messages.lock().unwrap(), vec!["Ferrari finished!"]);
        assert_eq!(run.standings().len(), 3);
    }

    #[test]
    fn test_same_lap_finishers_keep_grid_order() {
        let race = Race::new();
        let mut run = race.start(vec![
            Vehicle::with_speed("A", VehicleKind::Truck, 10),
            Vehicle::with_speed("B", VehicleKind::Truck, 10),
        ]);

        let report = loop {
            let report = run.step_lap();
            if !report.finished.is_empty() {
                break report;
            }
        };

        assert_eq!(report.lap, 10);
        assert_eq!(report.finished, vec!["A", "B"]);
        assert!(report.complete);
        assert_eq!(run.standings()[1].place, 2);
    }

    #[test]
    fn test_step_after_completion_is_noop() {
        let race = Race::new();
        let mut run = race.start(vec![Vehicle::with_speed("Solo", VehicleKind::SportsCar, 100)]);

        let first = run.step_lap();
        let second = run.step_lap();

        assert!(first.complete);
        assert_eq!(second.lap, 1);
        assert!(second.finished.is_empty());
        assert_eq!(run.lap(), 1);
    }

    #[test]
    fn test_empty_race_is_complete() {
        let mut run = Race::new().start(Vec::new());
        assert!(run.is_complete());
        let summary = run.run_to_completion(0).unwrap();
        assert_eq!(summary.laps, 0);
        assert!(summary.winner().is_none());
    }

    #[test]
    fn test_lap_limit() {
        let mut run = Race::new().start(vec![
            Vehicle::with_speed("Fast", VehicleKind::SportsCar, 50),
            Vehicle::with_speed("Slow", VehicleKind::Bus, 1),
        ]);

        let err = run.run_to_completion(5).unwrap_err();

        match err {
            EventedError::LapLimitExceeded { laps, finished, total } => {
                assert_eq!(laps, 5);
                assert_eq!(finished, 1);
                assert_eq!(total, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(run.summary(RaceOutcome::LapLimitReached).unfinished, vec!["Slow"]);
    }
}

use crate::app::console::Console;
use crate::config::toml_config::RaceConfig;
use crate::core::engine::{RaceEngine, StopSignal};
use crate::core::race::Race;
use crate::core::vehicle::Vehicle;
use crate::domain::model::{RaceOutcome, RaceSummary};
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Builds the starting grid in configured order.
pub fn build_roster(config: &RaceConfig) -> Result<Vec<Vehicle>> {
    match config.seed {
        Some(seed) => build_roster_with(config, &mut StdRng::seed_from_u64(seed)),
        None => build_roster_with(config, &mut rand::thread_rng()),
    }
}

fn build_roster_with<R: Rng + ?Sized>(config: &RaceConfig, rng: &mut R) -> Result<Vec<Vehicle>> {
    config
        .vehicles
        .iter()
        .map(|entry| -> Result<Vehicle> {
            let kind = entry.vehicle_kind()?;
            let vehicle = match entry.speed {
                Some(speed) => Vehicle::with_speed(entry.model.as_str(), kind, speed),
                None => Vehicle::with_speed_range(
                    entry.model.as_str(),
                    kind,
                    entry.speed_range()?,
                    &mut *rng,
                ),
            };
            tracing::debug!("🚗 {} ({}) speed {}", vehicle.model(), kind, vehicle.speed());
            Ok(vehicle.with_finish_line(config.finish_line))
        })
        .collect()
}

/// Runs the race on the engine, printing start and finish lines as they happen.
pub async fn run(config: &RaceConfig, console: &Console, stop: &StopSignal) -> Result<RaceSummary> {
    let vehicles = build_roster(config)?;

    let race = Race::new();
    {
        let console = console.clone();
        race.on_start(move || console.line_or_warn("Race started!"));
    }
    {
        let console = console.clone();
        race.on_finish(move |message| console.line_or_warn(message));
    }
    for vehicle in &vehicles {
        race.subscribe(vehicle);
    }

    let race_run = race.start(vehicles);
    let mut engine = RaceEngine::new(race_run)
        .with_max_laps(config.max_laps)
        .with_lap_delay(Duration::from_millis(config.lap_delay_ms));

    Ok(engine.run(stop).await)
}

/// 以表格列出名次
pub fn print_standings(summary: &RaceSummary, console: &Console) -> Result<()> {
    let outcome = match summary.outcome {
        RaceOutcome::Completed => "completed",
        RaceOutcome::Cancelled => "cancelled",
        RaceOutcome::LapLimitReached => "stopped at lap limit",
    };
    console.line(format!("Race {} after {} lap(s)", outcome, summary.laps))?;
    console.line(format!("{:<6}{:<16}{:<16}{:>6}{:>6}", "Place", "Model", "Kind", "Speed", "Lap"))?;
    for standing in &summary.standings {
        console.line(format!(
            "{:<6}{:<16}{:<16}{:>6}{:>6}",
            standing.place,
            standing.model,
            standing.kind.as_str(),
            standing.speed,
            standing.lap
        ))?;
    }
    for model in &summary.unfinished {
        console.line(format!("{:<6}{:<16}", "DNF", model))?;
    }
    Ok(())
}

pub fn print_json(summary: &RaceSummary, console: &Console) -> Result<()> {
    console.line(serde_json::to_string_pretty(summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::console::Capture;
    use crate::config::toml_config::VehicleConfig;
    use crate::domain::model::VehicleKind;

    fn fixed(model: &str, kind: VehicleKind, speed: u32) -> VehicleConfig {
        VehicleConfig {
            speed: Some(speed),
            ..VehicleConfig::new(model, kind)
        }
    }

    #[test]
    fn test_seeded_roster_is_reproducible() {
        let config = RaceConfig {
            seed: Some(42),
            ..RaceConfig::default()
        };

        let first: Vec<u32> = build_roster(&config).unwrap().iter().map(Vehicle::speed).collect();
        let second: Vec<u32> = build_roster(&config).unwrap().iter().map(Vehicle::speed).collect();

        assert_eq!(first, second);
        for (vehicle, entry) in build_roster(&config).unwrap().iter().zip(&config.vehicles) {
            assert_eq!(vehicle.model(), entry.model);
            assert!(entry.speed_range().unwrap().contains(vehicle.speed()));
            assert_eq!(vehicle.finish_line(), 100);
        }
    }

    #[tokio::test]
    async fn test_race_prints_start_and_finishes() {
        let capture = Capture::new();
        let config = RaceConfig {
            vehicles: vec![
                fixed("Volvo", VehicleKind::Truck, 10),
                fixed("Ferrari", VehicleKind::SportsCar, 19),
            ],
            ..RaceConfig::default()
        };

        let summary = run(&config, &capture.console(), &StopSignal::never()).await.unwrap();

        assert_eq!(summary.outcome, RaceOutcome::Completed);
        assert_eq!(summary.laps, 10);
        assert_eq!(
            capture.lines(),
            vec!["Race started!", "Ferrari finished!", "Volvo finished!"]
        );
    }

    #[tokio::test]
    async fn test_lap_limit_outcome() {
        let capture = Capture::new();
        let config = RaceConfig {
            finish_line: 1_000,
            max_laps: 2,
            vehicles: vec![fixed("Ikarus", VehicleKind::Bus, 4)],
            ..RaceConfig::default()
        };

        let summary = run(&config, &capture.console(), &StopSignal::never()).await.unwrap();

        assert_eq!(summary.outcome, RaceOutcome::LapLimitReached);
        assert_eq!(summary.unfinished, vec!["Ikarus"]);
    }

    #[test]
    fn test_print_standings() {
        let capture = Capture::new();
        let mut run = Race::new().start(vec![
            Vehicle::with_speed("Ferrari", VehicleKind::SportsCar, 50),
            Vehicle::with_speed("Ikarus", VehicleKind::Bus, 4).with_finish_line(1_000),
        ]);
        run.step_lap();
        run.step_lap();
        let summary = run.summary(RaceOutcome::Cancelled);

        print_standings(&summary, &capture.console()).unwrap();

        let lines = capture.lines();
        assert_eq!(lines[0], "Race cancelled after 2 lap(s)");
        assert!(lines[2].starts_with("1     Ferrari"));
        assert!(lines[3].starts_with("DNF   Ikarus"));
    }

    #[test]
    fn test_print_json() {
        let capture = Capture::new();
        let summary = Race::new().start(Vec::new()).summary(RaceOutcome::Completed);

        print_json(&summary, &capture.console()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&capture.contents()).unwrap();
        assert_eq!(value["outcome"], "completed");
        assert_eq!(value["laps"], 0);
    }
}

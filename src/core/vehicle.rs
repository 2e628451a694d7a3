use crate::core::event::{Event, SubscriptionId};
use crate::domain::model::{
    SpeedRange, StepOutcome, VehicleKind, VehicleState, DEFAULT_FINISH_LINE,
};
use rand::Rng;

/// A race participant. Kinds differ only in the range their speed is drawn from.
#[derive(Debug)]
pub struct Vehicle {
    model: String,
    kind: VehicleKind,
    speed: u32,
    position: u32,
    finish_line: u32,
    state: VehicleState,
    finished: Event<String>,
}

impl Vehicle {
    /// Draws the speed from the kind's range with the thread-local RNG.
    pub fn new(model: impl Into<String>, kind: VehicleKind) -> Self {
        Self::with_rng(model, kind, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        model: impl Into<String>,
        kind: VehicleKind,
        rng: &mut R,
    ) -> Self {
        Self::with_speed_range(model, kind, kind.speed_range(), rng)
    }

    /// Draws the speed from `range` instead of the kind's default range.
    pub fn with_speed_range<R: Rng + ?Sized>(
        model: impl Into<String>,
        kind: VehicleKind,
        range: SpeedRange,
        rng: &mut R,
    ) -> Self {
        Self::with_speed(model, kind, range.sample(rng))
    }

    /// Fixed speed, bypassing the kind's range.
    pub fn with_speed(model: impl Into<String>, kind: VehicleKind, speed: u32) -> Self {
        Self {
            model: model.into(),
            kind,
            speed,
            position: 0,
            finish_line: DEFAULT_FINISH_LINE,
            state: VehicleState::Running,
            finished: Event::new(),
        }
    }

    pub fn with_finish_line(mut self, finish_line: u32) -> Self {
        self.finish_line = finish_line;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn finish_line(&self) -> u32 {
        self.finish_line
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == VehicleState::Finished
    }

    pub fn finish_message(&self) -> String {
        format!("{} finished!", self.model)
    }

    pub fn on_finish<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&String) + Send + Sync + 'static,
    {
        self.finished.subscribe(handler)
    }

    /// Advances by `speed`. The finish notification is emitted only on the
    /// step that moves the vehicle from `Running` to `Finished`.
    pub fn step(&mut self) -> StepOutcome {
        match self.state {
            VehicleState::Finished => StepOutcome::Idle,
            VehicleState::Running => {
                self.position = self.position.saturating_add(self.speed);
                if self.position < self.finish_line {
                    return StepOutcome::Moved;
                }

                self.state = VehicleState::Finished;
                let message = self.finish_message();
                tracing::debug!(
                    "🏁 {} crossed {} at {}",
                    self.model,
                    self.finish_line,
                    self.position
                );
                self.finished.publish(&message);
                StepOutcome::Finished
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::{Arc, Mutex};

    fn finish_log(vehicle: &Vehicle) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        vehicle.on_finish(move |msg| sink.lock().unwrap().push(msg.clone()));
        log
    }

    #[test]
    fn test_speed_ten_finishes_on_tenth_step() {
        let mut vehicle = Vehicle::with_speed("Ferrari", VehicleKind::SportsCar, 10);
        let log = finish_log(&vehicle);

        for n in 1..=9 {
            assert_eq!(vehicle.step(), StepOutcome::Moved);
            assert_eq!(vehicle.position(), n * 10);
            assert_eq!(vehicle.state(), VehicleState::Running);
        }
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(vehicle.step(), StepOutcome::Finished);
        assert_eq!(vehicle.position(), 100);
        assert!(vehicle.is_finished());
        assert_eq!(*log.lock().unwrap(), vec!["Ferrari finished!"]);
    }

    #[test]
    fn test_finish_emitted_once() {
        let mut vehicle = Vehicle::with_speed("Volvo", VehicleKind::Truck, 7);
        let log = finish_log(&vehicle);

        for _ in 0..50 {
            vehicle.step();
        }

        assert_eq!(log.lock().unwrap().len(), 1);
        // 15 * 7 = 105 是第一個 >= 100 的位置
        assert_eq!(vehicle.position(), 105);
        assert_eq!(vehicle.step(), StepOutcome::Idle);
        assert_eq!(vehicle.position(), 105);
    }

    #[test]
    fn test_position_is_steps_times_speed_until_finish() {
        let mut rng = StdRng::seed_from_u64(11);
        for kind in VehicleKind::ALL {
            let mut vehicle = Vehicle::with_rng("probe", kind, &mut rng);
            let speed = vehicle.speed();
            assert!(kind.speed_range().contains(speed));

            let mut n = 0;
            while !vehicle.is_finished() {
                vehicle.step();
                n += 1;
                assert_eq!(vehicle.position(), n * speed);
            }
            assert!(vehicle.position() >= 100);
            assert!(vehicle.position() - speed < 100);
        }
    }

    #[test]
    fn test_custom_speed_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let range = SpeedRange::new(30, 31).unwrap();
        let vehicle = Vehicle::with_speed_range("Scania", VehicleKind::Truck, range, &mut rng);
        assert_eq!(vehicle.speed(), 30);
    }

    #[test]
    fn test_custom_finish_line() {
        let mut vehicle = Vehicle::with_speed("Ikarus", VehicleKind::Bus, 4).with_finish_line(8);
        assert_eq!(vehicle.finish_line(), 8);
        assert_eq!(vehicle.step(), StepOutcome::Moved);
        assert_eq!(vehicle.step(), StepOutcome::Finished);
    }

    #[test]
    fn test_random_speed_within_kind_range() {
        for _ in 0..100 {
            let vehicle = Vehicle::new("Toyota", VehicleKind::PassengerCar);
            assert!((8..15).contains(&vehicle.speed()));
            assert_eq!(vehicle.kind(), VehicleKind::PassengerCar);
            assert_eq!(vehicle.model(), "Toyota");
        }
    }
}

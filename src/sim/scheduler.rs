use crate::state::SimState;

// ---------------------------------------------------------------------------
// Per-tick update model
// ---------------------------------------------------------------------------

/// One schedulable simulation component (atmosphere, aircraft, integrator).
pub trait Model {
    fn name(&self) -> &str;

    /// Do this tick's real work against the shared state.
    fn run(&mut self, state: &mut SimState);
}

// ---------------------------------------------------------------------------
// Scheduler: ordered model list with per-model rate divisors
// ---------------------------------------------------------------------------

struct Slot {
    model: Box<dyn Model>,
    /// Execution-rate divisor: 1 = every tick, n = every n-th tick,
    /// 0 = never.
    rate: u32,
    counter: u32,
}

/// Drives one global simulation tick. Every registered model is visited on
/// every tick, in registration order; decimation is a per-slot counter, so
/// one model skipping its work never skips the models after it.
#[derive(Default)]
pub struct Scheduler {
    slots: Vec<Slot>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append a model to the chain with its execution-rate divisor.
    pub fn schedule(&mut self, model: Box<dyn Model>, rate: u32) {
        // Counter primed so a freshly scheduled model runs on the next tick
        let counter = rate.saturating_sub(1);
        self.slots.push(Slot {
            model,
            rate,
            counter,
        });
    }

    /// Advance the simulation by one tick. A no-op with no models
    /// registered (beyond advancing simulation time).
    pub fn tick(&mut self, state: &mut SimState) {
        for slot in &mut self.slots {
            if slot.rate == 0 {
                continue;
            }
            slot.counter += 1;
            if slot.counter >= slot.rate {
                slot.counter = 0;
                slot.model.run(state);
            }
        }
        state.sim_time += state.dt;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Appends its tag to a shared log each time it does real work.
    struct Probe {
        tag: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Model for Probe {
        fn name(&self) -> &str {
            self.tag
        }

        fn run(&mut self, _state: &mut SimState) {
            self.log.borrow_mut().push(self.tag);
        }
    }

    fn probe(tag: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Box<Probe> {
        Box::new(Probe {
            tag,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn models_run_in_registration_order() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut sched = Scheduler::new();
        sched.schedule(probe("atmosphere", &log), 1);
        sched.schedule(probe("aircraft", &log), 1);
        sched.schedule(probe("eom", &log), 1);

        let mut state = SimState::default();
        sched.tick(&mut state);
        assert_eq!(*log.borrow(), vec!["atmosphere", "aircraft", "eom"]);
    }

    #[test]
    fn decimated_model_does_not_stop_the_chain() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut sched = Scheduler::new();
        sched.schedule(probe("a", &log), 1);
        sched.schedule(probe("slow", &log), 3);
        sched.schedule(probe("b", &log), 1);

        let mut state = SimState::default();
        for _ in 0..3 {
            sched.tick(&mut state);
        }
        // "b" runs every tick even on ticks where "slow" skips its work
        let runs = log.borrow();
        assert_eq!(runs.iter().filter(|t| **t == "a").count(), 3);
        assert_eq!(runs.iter().filter(|t| **t == "b").count(), 3);
        assert_eq!(runs.iter().filter(|t| **t == "slow").count(), 1);
    }

    #[test]
    fn rate_divisor_decimates_execution() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut sched = Scheduler::new();
        sched.schedule(probe("half", &log), 2);

        let mut state = SimState::default();
        for _ in 0..10 {
            sched.tick(&mut state);
        }
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn rate_zero_never_runs() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut sched = Scheduler::new();
        sched.schedule(probe("off", &log), 0);

        let mut state = SimState::default();
        for _ in 0..5 {
            sched.tick(&mut state);
        }
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn empty_scheduler_tick_is_a_no_op() {
        let mut sched = Scheduler::new();
        assert!(sched.is_empty());
        let mut state = SimState::default();
        let before = state.clone();
        sched.tick(&mut state);
        assert_eq!(state.u, before.u);
        assert_eq!(state.altitude, before.altitude);
    }

    #[test]
    fn full_chain_drops_an_unpowered_aircraft() {
        use crate::dynamics::Eom;
        use crate::physics::atmosphere::Atmosphere;
        use crate::state::InitialConditions;
        use crate::vehicle::AircraftBuilder;

        let aircraft = AircraftBuilder::new("brick").empty_weight(9_806.65).build();
        let ic = InitialConditions {
            altitude: 2_000.0,
            ..Default::default()
        };
        let mut state = SimState::with_initial(&ic, 0.01);

        let mut sched = Scheduler::new();
        sched.schedule(Box::new(Atmosphere), 1);
        sched.schedule(Box::new(aircraft), 1);
        sched.schedule(Box::new(Eom::new()), 1);

        for _ in 0..100 {
            sched.tick(&mut state);
        }

        // One second of free fall: gravity resolved by the aircraft model,
        // integrated by the EOM model
        assert!(state.w > 9.0, "should build sink rate, w = {}", state.w);
        assert!(state.altitude < 2_000.0);
        assert!(state.density > 0.9, "atmosphere should have run");
        assert_relative_eq!(state.sim_time, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn tick_advances_simulation_time() {
        let mut sched = Scheduler::new();
        let mut state = SimState::default();
        state.dt = 0.01;
        for _ in 0..100 {
            sched.tick(&mut state);
        }
        assert_relative_eq!(state.sim_time, 1.0, epsilon = 1e-9);
    }
}

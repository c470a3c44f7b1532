use crate::sim::{
    Event, PRIORITY_AURA_EXPIRE, PRIORITY_DOT, PRIORITY_LOW, PRIORITY_REGEN, PendingAction, SimTime,
    Simulator, World,
};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld;

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Push {
    id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for Push {
    fn execute(self: Box<Self>, _sim: &mut Simulator, _world: &mut dyn World) {
        let Push { id, log } = *self;
        log.lock().expect("log lock").push(id);
    }
}

struct PushThenScheduleNow {
    id: u32,
    next_id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for PushThenScheduleNow {
    fn execute(self: Box<Self>, sim: &mut Simulator, _world: &mut dyn World) {
        let PushThenScheduleNow { id, next_id, log } = *self;
        log.lock().expect("log lock").push(id);
        sim.schedule(sim.now(), Push { id: next_id, log });
    }
}

#[test]
fn scheduled_events_order_by_time_then_seq() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(10),
        Push {
            id: 1,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(5),
        Push {
            id: 2,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(10),
        Push {
            id: 3,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld;
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[2, 1, 3]);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn event_scheduled_at_same_time_inside_event_runs_after_current_event() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        PushThenScheduleNow {
            id: 1,
            next_id: 2,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld;
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn run_until_skips_events_after_until_and_advances_time() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        Push {
            id: 1,
            log: Arc::clone(&log),
        },
    );
    sim.schedule(
        SimTime(10),
        Push {
            id: 2,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld;
    sim.run_until(SimTime(5), &mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(sim.now(), SimTime(5));

    sim.run(&mut world);
    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn run_until_executes_events_scheduled_exactly_at_until() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(5),
        Push {
            id: 1,
            log: Arc::clone(&log),
        },
    );

    let mut world = DummyWorld;
    sim.run_until(SimTime(5), &mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(sim.now(), SimTime(5));
}

#[test]
fn run_until_advances_time_even_if_there_are_no_events() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld;

    sim.run_until(SimTime(7), &mut world);
    assert_eq!(sim.now(), SimTime(7));
}

#[test]
fn equal_time_events_order_by_priority_before_seq() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    for (id, prio) in [(1, PRIORITY_LOW), (2, PRIORITY_REGEN), (3, PRIORITY_AURA_EXPIRE), (4, PRIORITY_DOT)] {
        sim.schedule_with_priority(
            SimTime(10),
            prio,
            Push {
                id,
                log: Arc::clone(&log),
            },
        );
    }

    let mut world = DummyWorld;
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[3, 4, 2, 1]);
    assert_eq!(sim.executed(), 4);
}

#[test]
fn schedule_in_is_relative_to_now() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Simulator::default();
    let inner = Arc::clone(&log);
    sim.schedule(
        SimTime(100),
        PendingAction::new("relative", move |sim: &mut Simulator, _w: &mut dyn World| {
            sim.schedule_in(SimTime(50), PRIORITY_LOW, Push { id: 9, log: inner });
        }),
    );

    let mut world = DummyWorld;
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[9]);
    assert_eq!(sim.now(), SimTime(150));
}

#[test]
#[should_panic(expected = "cannot schedule")]
fn scheduling_into_the_past_panics() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld;
    sim.run_until(SimTime(10), &mut world);
    sim.schedule(
        SimTime(5),
        Push {
            id: 0,
            log: Arc::new(Mutex::new(Vec::new())),
        },
    );
}

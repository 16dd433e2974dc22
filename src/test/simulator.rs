use crate::net::{CableType, Network};
use crate::sim::{
    Event, NetWorld, PURGE_MACS_PERIOD, REFRESH_LINKS_PERIOD, SimTime, Simulator, World,
    schedule_maintenance,
};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    ticks: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks = self.ticks.saturating_add(1);
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
    for (at, id) in [(10, 1), (5, 2), (10, 3)] {
        sim.schedule(
            SimTime(at),
            Push {
                id,
                log: Arc::clone(&log),
            },
        );
    }

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[2, 1, 3]);
    assert_eq!(world.ticks, 3);
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

    let mut world = DummyWorld::default();
    sim.run(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(world.ticks, 2);
    assert_eq!(sim.now(), SimTime::ZERO);
}

#[test]
fn run_until_stops_at_the_boundary_and_ticks_once_more() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Simulator::default();
    for (at, id) in [(0, 1), (5, 2), (10, 3)] {
        sim.schedule(
            SimTime(at),
            Push {
                id,
                log: Arc::clone(&log),
            },
        );
    }

    let mut world = DummyWorld::default();
    sim.run_until(SimTime(5), &mut world);

    // 两个事件各一次，加上停在边界时的一次
    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(world.ticks, 3);
    assert_eq!(sim.now(), SimTime(5));
    assert_eq!(sim.pending(), 1);

    sim.run(&mut world);
    assert_eq!(&*log.lock().expect("log lock"), &[1, 2, 3]);
    assert_eq!(sim.now(), SimTime(10));
    assert_eq!(sim.pending(), 0);
}

#[test]
fn run_until_advances_time_even_if_there_are_no_events() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();

    sim.run_until(SimTime(7), &mut world);
    assert_eq!(sim.now(), SimTime(7));
    assert_eq!(world.ticks, 1);

    // 时钟不会倒退
    sim.run_until(SimTime(3), &mut world);
    assert_eq!(sim.now(), SimTime(7));
}

#[test]
fn sim_time_units_and_display() {
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_millis(12_345).to_string(), "12.345s");
    assert_eq!(SimTime::from_secs(3).since(SimTime::from_secs(5)), SimTime::ZERO);
}

#[test]
fn maintenance_keeps_rescheduling_inside_a_net_world() {
    let mut sim = Simulator::default();
    let mut world = NetWorld::new(Network::new());
    schedule_maintenance(&mut sim, SimTime::ZERO);
    assert_eq!(sim.pending(), 3);

    sim.run_until(SimTime::from_secs(2), &mut world);
    assert_eq!(sim.pending(), 3);
    assert_eq!(world.net.now(), SimTime::from_secs(2));
    assert_eq!(REFRESH_LINKS_PERIOD, SimTime::from_millis(250));
}

#[test]
fn maintenance_stops_without_a_network() {
    let mut sim = Simulator::default();
    let mut world = DummyWorld::default();
    schedule_maintenance(&mut sim, SimTime::ZERO);
    sim.run_until(SimTime::from_secs(5), &mut world);
    assert_eq!(sim.pending(), 0);
}

#[test]
fn mac_entries_age_out_on_the_maintenance_clock() {
    let mut net = Network::new();
    let sw = net.add_switch("SW1");
    if let Some(s) = net.switch_mut(sw) {
        s.learn_mac("AA:AA:AA:AA:AA:01", 1, "Gi0/1", SimTime::ZERO);
    }
    let mut sim = Simulator::default();
    let mut world = NetWorld::new(net);
    schedule_maintenance(&mut sim, SimTime::ZERO);

    sim.run_until(SimTime::from_secs(30), &mut world);
    assert_eq!(world.net.switch(sw).map(|s| s.mac_table.len()), Some(1));

    sim.run_until(SimTime::from_secs(30) + PURGE_MACS_PERIOD, &mut world);
    assert_eq!(world.net.switch(sw).map(|s| s.mac_table.len()), Some(0));
}

#[test]
fn refresh_event_brings_links_up_after_admin_change() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    net.add_switch("SW1");
    net.connect_by_name("R1", "Gi0/0", "SW1", "Gi0/1", CableType::Auto).expect("cable");
    if let Some(router) = net.router_mut(r) {
        if let Some(itf) = router.interface_mut("Gi0/0") {
            itf.admin_up = true;
        }
    }
    assert!(net.router(r).and_then(|x| x.interface("Gi0/0")).is_some_and(|i| !i.protocol_up));

    let mut sim = Simulator::default();
    let mut world = NetWorld::new(net);
    schedule_maintenance(&mut sim, SimTime::ZERO);
    sim.run_until(REFRESH_LINKS_PERIOD, &mut world);
    assert!(
        world
            .net
            .router(r)
            .and_then(|x| x.interface("Gi0/0"))
            .is_some_and(|i| i.protocol_up)
    );
}

// Synthetic event sequences driven through the controller with the simulated HAL

use hall_bldc::phase::{self, ElectricalPhase};
use hall_bldc::sim::{RecordingDelay, RecordingDriver};
use hall_bldc::{Button, ControllerConfig, Event, HallReading, HallTracker, MotorController};

fn hall(code: u8) -> Event {
    Event::HallEdge(HallReading::from_code(code))
}

#[test]
fn test_forward_rotation_visits_every_phase_in_order() {
    let mut driver = RecordingDriver::new();
    let mut delay = RecordingDelay::new();
    let mut ctrl = MotorController::new(&mut driver, &ControllerConfig::default()).unwrap();

    let codes = [0b101, 0b001, 0b011, 0b010, 0b110, 0b100, 0b101];
    let mut phases = [0u8; 7];
    for (slot, code) in phases.iter_mut().zip(codes) {
        *slot = ctrl.step(hall(code), &mut delay).unwrap().index();
        assert_eq!(
            ctrl.driver().last(),
            Some(phase::pattern(ElectricalPhase::new(*slot).unwrap()))
        );
    }

    assert_eq!(phases, [1, 2, 3, 4, 5, 0, 1]);
    assert_eq!(
        ctrl.driver().previous(),
        Some(phase::pattern(ElectricalPhase::ALL[0]))
    );
    assert_eq!(ctrl.snapshot().commutations, 7);
    assert_eq!(delay.total_us(), 7 * 10_000);
}

#[test]
fn test_fault_in_the_middle_of_rotation_is_skipped() {
    let mut ctrl = MotorController::new(RecordingDriver::new(), &ControllerConfig::default()).unwrap();
    let mut delay = RecordingDelay::new();

    ctrl.step(hall(0b101), &mut delay);
    ctrl.step(hall(0b001), &mut delay);
    let held = ctrl.driver().last();

    assert_eq!(ctrl.step(hall(0b000), &mut delay), None);
    assert_eq!(ctrl.driver().last(), held);
    assert!(ctrl.snapshot().hall_fault);

    assert_eq!(ctrl.step(hall(0b011), &mut delay).map(|p| p.index()), Some(3));
    let snapshot = ctrl.snapshot();
    assert!(!snapshot.hall_fault);
    assert_eq!(snapshot.undefined_hall_codes, 1);
    assert_eq!(snapshot.commutations, 3);
}

#[test]
fn test_speed_windows_and_stall_alongside_commutation() {
    let mut ctrl = MotorController::new(RecordingDriver::new(), &ControllerConfig::default()).unwrap();
    let mut delay = RecordingDelay::new();

    ctrl.step(hall(0b100), &mut delay);
    ctrl.step(Event::TimerTick { edges: 40 }, &mut delay);
    assert_eq!(ctrl.snapshot().rpm, 600);

    for _ in 0..3 {
        ctrl.step(Event::TimerTick { edges: 0 }, &mut delay);
        let snapshot = ctrl.snapshot();
        assert_eq!(snapshot.frequency_hz, 0);
        assert_eq!(snapshot.rpm, 0);
    }
    assert!(ctrl.snapshot().stalled);
    // 速度サンプルは転流状態に影響しない
    assert_eq!(ctrl.snapshot().phase.index(), 0);
    assert_eq!(ctrl.snapshot().commutations, 1);
}

#[test]
fn test_delay_wraps_to_minimum_through_events() {
    let config = ControllerConfig {
        initial_delay_us: 1_000_000,
        ..ControllerConfig::default()
    };
    let mut ctrl = MotorController::new(RecordingDriver::new(), &config).unwrap();
    let mut delay = RecordingDelay::new();

    ctrl.step(Event::ButtonEdge(Button::Increase), &mut delay);
    assert_eq!(ctrl.commutation_delay().as_micros(), 1);

    ctrl.step(Event::ButtonEdge(Button::Decrease), &mut delay);
    assert_eq!(ctrl.commutation_delay().as_micros(), 1);

    ctrl.step(hall(0b010), &mut delay);
    assert_eq!(delay.total_us(), 1);
}

#[test]
fn test_ticks_and_buttons_while_commutation_is_pending() {
    let mut ctrl = MotorController::new(RecordingDriver::new(), &ControllerConfig::default()).unwrap();

    let pending = ctrl.handle(hall(0b011)).unwrap();

    // デッドタイム待機中に届いた速度サンプルとボタンはその場で反映される
    assert!(ctrl.handle(Event::TimerTick { edges: 40 }).is_none());
    assert!(ctrl.handle(Event::ButtonEdge(Button::Increase)).is_none());
    let snapshot = ctrl.snapshot();
    assert_eq!(snapshot.rpm, 600);
    assert_eq!(snapshot.commutation_delay_us, 10_100);
    assert_eq!(ctrl.driver().writes(), 0);

    // 待機中の転流はアーム時のデッドタイムのまま確定する
    assert_eq!(pending.dead_time().as_micros(), 10_000);
    ctrl.commit(pending);
    assert_eq!(ctrl.snapshot().phase.index(), 3);
    assert_eq!(ctrl.driver().writes(), 1);
}

#[test]
fn test_only_latest_hall_reading_is_commutated() {
    let mut ctrl = MotorController::new(RecordingDriver::new(), &ControllerConfig::default()).unwrap();
    let mut delay = RecordingDelay::new();
    let mut tracker = HallTracker::new(HallReading::from_code(0b101));

    // 待機中に2つエッジが来ても、残るのは最新の読み取りだけ
    let mut latest = None;
    for code in [0b001, 0b011] {
        if let Some(reading) = tracker.changed(HallReading::from_code(code)) {
            latest = Some(reading);
        }
    }

    let reading = latest.unwrap();
    assert_eq!(ctrl.step(Event::HallEdge(reading), &mut delay).map(|p| p.index()), Some(3));
    assert_eq!(ctrl.driver().writes(), 1);
    assert_eq!(delay.calls(), 1);
}

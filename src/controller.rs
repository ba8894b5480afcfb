//! イベント駆動モーターコントローラ
//!
//! Hallエッジ・1秒タイマー・ボタンエッジをすべて [`Event`] として受け取り、
//! 単一の所有者がデコーダ・転流器・速度推定・遅延調整の状態をまとめて更新します。
//! 割り込み間で共有する可変状態をなくし、合成イベント列でテストできるようにしています。

use embedded_hal::delay::DelayNs;

use crate::commutator::{PendingCommutation, PhaseCommutator, PhaseDriver};
use crate::config::{ConfigError, ControllerConfig};
use crate::delay::{Button, CommutationDelay, DelayController};
use crate::hall::{HallDecoder, HallReading};
use crate::phase::ElectricalPhase;
use crate::speed::SpeedEstimator;
use crate::telemetry::TelemetrySnapshot;

/// Hardware event delivered to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Any edge on any Hall line, with all three levels sampled together
    HallEdge(HallReading),
    /// Sampling window closed; `edges` is the counter value read-and-reset at the boundary
    TimerTick { edges: u32 },
    /// Debounced press of a delay adjustment button
    ButtonEdge(Button),
}

/// Owns all commutation, speed and delay state
pub struct MotorController<D> {
    decoder: HallDecoder,
    commutator: PhaseCommutator<D>,
    speed: SpeedEstimator,
    delay: DelayController,
    startup_phase: ElectricalPhase,
}

impl<D: PhaseDriver> MotorController<D> {
    /// 新しいコントローラを作成
    ///
    /// # Arguments
    /// * `driver` - 3巻線の出力段
    /// * `config` - 検証前の設定
    ///
    /// # Returns
    /// * `Err(ConfigError)` - 設定が不正な場合
    pub fn new(driver: D, config: &ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let startup_phase = config.startup_phase()?;
        let initial_delay = CommutationDelay::try_new(config.initial_delay_us)?;

        info!(
            "Motor controller: pole constant={}, delay={}us, step={}us, stall after {} periods",
            config.pole_constant,
            initial_delay.as_micros(),
            config.delay_step_us,
            config.stall_threshold
        );

        Ok(Self {
            decoder: HallDecoder::new(),
            commutator: PhaseCommutator::new(driver),
            speed: SpeedEstimator::new(config.pole_constant, config.stall_threshold),
            delay: DelayController::new(initial_delay, config.delay_step_us),
            startup_phase,
        })
    }

    /// 起動時の初期転流を準備
    ///
    /// 初期Hall読み取りが有効ならそのフェーズ、不定なら設定の起動フェーズを使います。
    pub fn start(&mut self, initial: HallReading) -> PendingCommutation {
        let phase = match self.decoder.update(initial) {
            Ok(phase) => phase,
            Err(_) => {
                warn!(
                    "Start-up hall code {} undefined, kicking into phase {}",
                    initial.code(),
                    self.startup_phase.index()
                );
                self.startup_phase
            }
        };

        info!("Starting in phase {}", phase.index());
        self.commutator.arm(phase, self.delay.delay())
    }

    /// Apply one event to the state
    ///
    /// # Returns
    /// An armed commutation for a Hall edge with a valid code. The caller
    /// waits its dead-time and hands it back to [`Self::commit`].
    pub fn handle(&mut self, event: Event) -> Option<PendingCommutation> {
        match event {
            Event::HallEdge(reading) => match self.decoder.update(reading) {
                Ok(phase) => Some(self.commutator.arm(phase, self.delay.delay())),
                // 不定コード: 前回フェーズを保持し転流しない
                Err(_) => None,
            },
            Event::TimerTick { edges } => {
                self.speed.sample(edges);
                None
            }
            Event::ButtonEdge(button) => {
                let delay = self.delay.on_button(button);
                debug!("{:?} -> commutation delay {}us", button, delay.as_micros());
                None
            }
        }
    }

    pub fn commit(&mut self, pending: PendingCommutation) {
        self.commutator.commit(pending);
    }

    /// Handle an event and busy-wait any resulting dead-time in place
    ///
    /// # Returns
    /// The phase written to the outputs, if the event commutated
    pub fn step<T: DelayNs>(&mut self, event: Event, delay: &mut T) -> Option<ElectricalPhase> {
        let pending = self.handle(event)?;
        delay.delay_us(pending.dead_time().as_micros());
        self.commit(pending);
        Some(pending.phase())
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let speed = self.speed.latest();
        TelemetrySnapshot {
            phase: self.commutator.applied(),
            frequency_hz: speed.frequency_hz,
            rpm: speed.rpm,
            commutation_delay_us: self.delay.delay().as_micros(),
            stalled: self.speed.is_stalled(),
            hall_fault: self.decoder.fault(),
            undefined_hall_codes: self.decoder.undefined_codes(),
            commutations: self.commutator.commutations(),
        }
    }

    pub fn commutation_delay(&self) -> CommutationDelay {
        self.delay.delay()
    }

    pub fn driver(&self) -> &D {
        self.commutator.driver()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase;
    use crate::sim::{RecordingDelay, RecordingDriver};

    fn controller() -> MotorController<RecordingDriver> {
        MotorController::new(RecordingDriver::new(), &ControllerConfig::default()).unwrap()
    }

    fn hall(code: u8) -> Event {
        Event::HallEdge(HallReading::from_code(code))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ControllerConfig {
            stall_threshold: 0,
            ..ControllerConfig::new()
        };
        assert!(matches!(
            MotorController::new(RecordingDriver::new(), &config),
            Err(ConfigError::ZeroStallThreshold)
        ));
    }

    #[test]
    fn test_hall_edge_commutates_after_dead_time() {
        let mut ctrl = controller();
        let mut delay = RecordingDelay::new();

        let phase = ctrl.step(hall(0b011), &mut delay);

        assert_eq!(phase.map(|p| p.index()), Some(3));
        assert_eq!(delay.total_us(), 10_000);
        assert_eq!(ctrl.driver().last(), Some(phase::pattern(ElectricalPhase::ALL[3])));
        assert_eq!(ctrl.snapshot().phase.index(), 3);
    }

    #[test]
    fn test_undefined_code_does_not_commutate() {
        let mut ctrl = controller();
        let mut delay = RecordingDelay::new();
        ctrl.step(hall(0b110), &mut delay);

        assert_eq!(ctrl.step(hall(0b000), &mut delay), None);
        assert_eq!(ctrl.step(hall(0b111), &mut delay), None);

        let snapshot = ctrl.snapshot();
        assert_eq!(ctrl.driver().writes(), 1);
        assert_eq!(delay.calls(), 1);
        assert_eq!(snapshot.phase.index(), 5);
        assert!(snapshot.hall_fault);
        assert_eq!(snapshot.undefined_hall_codes, 2);
    }

    #[test]
    fn test_button_changes_next_dead_time() {
        let mut ctrl = controller();
        ctrl.handle(Event::ButtonEdge(Button::Increase));
        ctrl.handle(Event::ButtonEdge(Button::Increase));

        let pending = ctrl.handle(hall(0b101)).unwrap();
        assert_eq!(pending.dead_time().as_micros(), 10_200);
        assert_eq!(ctrl.snapshot().commutation_delay_us, 10_200);
    }

    #[test]
    fn test_timer_tick_updates_speed_only() {
        let mut ctrl = controller();
        assert!(ctrl.handle(Event::TimerTick { edges: 40 }).is_none());

        let snapshot = ctrl.snapshot();
        assert_eq!(snapshot.frequency_hz, 40);
        assert_eq!(snapshot.rpm, 600);
        assert_eq!(snapshot.commutations, 0);
        assert_eq!(ctrl.driver().writes(), 0);
    }

    #[test]
    fn test_start_uses_decoded_phase() {
        let mut ctrl = controller();
        let pending = ctrl.start(HallReading::from_code(0b010));
        assert_eq!(pending.phase().index(), 4);
        ctrl.commit(pending);
        assert_eq!(ctrl.snapshot().phase.index(), 4);
    }

    #[test]
    fn test_start_falls_back_to_startup_phase() {
        let mut ctrl = controller();
        let pending = ctrl.start(HallReading::from_code(0b111));
        assert_eq!(pending.phase().index(), 1);
        ctrl.commit(pending);
        assert_eq!(ctrl.driver().last(), Some(phase::pattern(ElectricalPhase::ALL[1])));
    }
}

//! 転流遅延（デッドタイム）とボタン入力
//!
//! 転流遅延はボタンの押下エッジごとに ±100μs 調整されます。
//! 調整結果が範囲外になった場合は最寄りの境界ではなく最小値 1μs に戻します。

use crate::config::{
    ConfigError, DEFAULT_COMMUTATION_DELAY_US, MAX_COMMUTATION_DELAY_US, MIN_COMMUTATION_DELAY_US,
};

/// Dead-time inserted before every commutation, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommutationDelay(u32);

impl CommutationDelay {
    pub const MIN: Self = Self(MIN_COMMUTATION_DELAY_US);
    pub const MAX: Self = Self(MAX_COMMUTATION_DELAY_US);
    pub const DEFAULT: Self = Self(DEFAULT_COMMUTATION_DELAY_US);

    /// Assign a delay; out-of-bound values fall back to `DEFAULT`
    pub const fn new(us: u32) -> Self {
        if Self::in_range(us) {
            Self(us)
        } else {
            Self::DEFAULT
        }
    }

    /// Validated construction for configuration values
    pub const fn try_new(us: u32) -> Result<Self, ConfigError> {
        if Self::in_range(us) {
            Ok(Self(us))
        } else {
            Err(ConfigError::DelayOutOfRange(us))
        }
    }

    /// Apply a signed adjustment
    ///
    /// A result below 1 or above 1_000_000 resets to `MIN`, it is not clamped.
    pub fn adjusted(self, delta_us: i32) -> Self {
        match self.0.checked_add_signed(delta_us) {
            Some(us) if Self::in_range(us) => Self(us),
            _ => Self::MIN,
        }
    }

    pub const fn as_micros(self) -> u32 {
        self.0
    }

    const fn in_range(us: u32) -> bool {
        us >= MIN_COMMUTATION_DELAY_US && us <= MAX_COMMUTATION_DELAY_US
    }
}

impl Default for CommutationDelay {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 遅延調整ボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// 遅延を増やす
    Increase,
    /// 遅延を減らす
    Decrease,
}

/// Integrating debounce for one push button
///
/// The stable level only changes after `threshold` consecutive samples
/// disagree with it. A press edge is reported once per press.
#[derive(Debug, Clone)]
pub struct Debouncer {
    pressed: bool,
    counter: u8,
    threshold: u8,
}

impl Debouncer {
    pub const fn new(threshold: u8) -> Self {
        Self {
            pressed: false,
            counter: 0,
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Feed one sample
    ///
    /// # Returns
    /// `true` exactly on the sample where a press is accepted
    pub fn sample(&mut self, pressed: bool) -> bool {
        if pressed == self.pressed {
            self.counter = 0;
            return false;
        }

        self.counter = self.counter.saturating_add(1);
        if self.counter < self.threshold {
            return false;
        }

        self.counter = 0;
        self.pressed = pressed;
        pressed
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// 増減ボタン2個分のデバウンス
#[derive(Debug, Clone)]
pub struct ButtonPanel {
    increase: Debouncer,
    decrease: Debouncer,
}

impl ButtonPanel {
    pub const fn new(debounce_samples: u8) -> Self {
        Self {
            increase: Debouncer::new(debounce_samples),
            decrease: Debouncer::new(debounce_samples),
        }
    }

    /// メインループ1周ごとに呼び出す
    ///
    /// # Arguments
    /// * `increase_pressed` - 増加ボタンが押されているか（アクティブLowの変換は呼び出し側）
    /// * `decrease_pressed` - 減少ボタンが押されているか
    ///
    /// # Returns
    /// このサンプルで確定した押下エッジ
    pub fn sample(&mut self, increase_pressed: bool, decrease_pressed: bool) -> [Option<Button>; 2] {
        [
            self.increase
                .sample(increase_pressed)
                .then_some(Button::Increase),
            self.decrease
                .sample(decrease_pressed)
                .then_some(Button::Decrease),
        ]
    }
}

/// Single writer of the commutation delay
#[derive(Debug, Clone)]
pub struct DelayController {
    delay: CommutationDelay,
    step_us: u32,
}

impl DelayController {
    pub fn new(initial: CommutationDelay, step_us: u32) -> Self {
        Self {
            delay: initial,
            step_us,
        }
    }

    /// Adjust the delay for one button edge
    pub fn on_button(&mut self, button: Button) -> CommutationDelay {
        let step = i32::try_from(self.step_us).unwrap_or(i32::MAX);
        let delta = match button {
            Button::Increase => step,
            Button::Decrease => -step,
        };

        let previous = self.delay;
        let requested = i64::from(previous.as_micros()) + i64::from(delta);
        self.delay = previous.adjusted(delta);

        if i64::from(self.delay.as_micros()) != requested {
            debug!(
                "Commutation delay out of range from {}us, reset to {}us",
                previous.as_micros(),
                self.delay.as_micros()
            );
        }

        self.delay
    }

    pub fn delay(&self) -> CommutationDelay {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_out_of_range_uses_default() {
        assert_eq!(CommutationDelay::new(0), CommutationDelay::DEFAULT);
        assert_eq!(CommutationDelay::new(1_000_001), CommutationDelay::DEFAULT);
        assert_eq!(CommutationDelay::new(250).as_micros(), 250);
        assert_eq!(
            CommutationDelay::try_new(0),
            Err(ConfigError::DelayOutOfRange(0))
        );
    }

    #[test]
    fn test_increment_above_max_wraps_to_min() {
        let mut ctrl = DelayController::new(CommutationDelay::MAX, 100);
        assert_eq!(ctrl.on_button(Button::Increase), CommutationDelay::MIN);
        assert_eq!(ctrl.delay().as_micros(), 1);
    }

    #[test]
    fn test_decrement_below_min_wraps_to_min() {
        let mut ctrl = DelayController::new(CommutationDelay::MIN, 100);
        assert_eq!(ctrl.on_button(Button::Decrease).as_micros(), 1);

        // 50 - 100 < 1 なので最寄りの境界ではなく最小値へ
        let mut ctrl = DelayController::new(CommutationDelay::new(50), 100);
        assert_eq!(ctrl.on_button(Button::Decrease).as_micros(), 1);
    }

    #[test]
    fn test_in_range_steps() {
        let mut ctrl = DelayController::new(CommutationDelay::DEFAULT, 100);
        ctrl.on_button(Button::Increase);
        ctrl.on_button(Button::Increase);
        ctrl.on_button(Button::Decrease);
        assert_eq!(ctrl.delay().as_micros(), 10_100);

        let mut ctrl = DelayController::new(CommutationDelay::new(999_900), 100);
        assert_eq!(ctrl.on_button(Button::Increase), CommutationDelay::MAX);
    }

    #[test]
    fn test_debouncer_reports_single_press() {
        let mut button = Debouncer::new(2);
        assert!(!button.sample(true));
        assert!(button.sample(true));
        // 押しっぱなしでは再通知しない
        assert!(!button.sample(true));
        assert!(!button.sample(true));
        assert!(button.is_pressed());

        assert!(!button.sample(false));
        assert!(!button.sample(false));
        assert!(!button.is_pressed());
        assert!(!button.sample(true));
        assert!(button.sample(true));
    }

    #[test]
    fn test_debouncer_rejects_glitch() {
        let mut button = Debouncer::new(3);
        assert!(!button.sample(true));
        assert!(!button.sample(false));
        assert!(!button.sample(true));
        assert!(!button.sample(true));
        assert!(!button.is_pressed());
        assert!(button.sample(true));
    }

    #[test]
    fn test_panel_edges() {
        let mut panel = ButtonPanel::new(1);
        assert_eq!(panel.sample(true, false), [Some(Button::Increase), None]);
        assert_eq!(panel.sample(true, true), [None, Some(Button::Decrease)]);
        assert_eq!(panel.sample(false, false), [None, None]);
    }
}

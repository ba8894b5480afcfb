//! コントローラ設定パラメータ

use crate::delay::CommutationDelay;
use crate::phase::ElectricalPhase;

/// 転流遅延の最小値 [μs]
pub const MIN_COMMUTATION_DELAY_US: u32 = 1;

/// 転流遅延の最大値 [μs]（1秒）
pub const MAX_COMMUTATION_DELAY_US: u32 = 1_000_000;

/// 転流遅延の初期値 [μs]（デフォルト値）
pub const DEFAULT_COMMUTATION_DELAY_US: u32 = 10_000;

/// ボタン1回あたりの遅延調整量 [μs]（デフォルト値）
pub const DELAY_STEP_US: u32 = 100;

/// 速度換算の極定数（RPM = Hz × 60 / 極定数）（デフォルト値）
pub const DEFAULT_POLE_CONSTANT: u32 = 4;

/// 失速判定に必要な連続ゼロサンプル数（デフォルト値）
pub const DEFAULT_STALL_THRESHOLD: u8 = 3;

/// ボタンのデバウンスサンプル数（デフォルト値）
pub const DEFAULT_DEBOUNCE_SAMPLES: u8 = 2;

/// 起動時にHall状態が不定だった場合に印加するフェーズ（デフォルト値）
pub const DEFAULT_STARTUP_PHASE: u8 = 1;

/// 設定エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// 極定数が0
    ZeroPoleConstant,
    /// 転流遅延が 1..=1_000_000 μs の範囲外
    DelayOutOfRange(u32),
    /// 遅延調整量が0
    ZeroDelayStep,
    /// 失速判定しきい値が0
    ZeroStallThreshold,
    /// デバウンスサンプル数が0
    ZeroDebounceSamples,
    /// 起動フェーズが 0..=5 の範囲外
    InvalidStartupPhase(u8),
}

/// Runtime parameters for [`crate::MotorController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Divisor that scales edge frequency to RPM (motor-specific)
    pub pole_constant: u32,
    /// Commutation delay at power-on [μs]
    pub initial_delay_us: u32,
    /// Adjustment per button edge [μs]
    pub delay_step_us: u32,
    /// Consecutive zero-edge periods before the rotor is reported stalled
    pub stall_threshold: u8,
    /// Consecutive equal samples before a button level is accepted
    pub debounce_samples: u8,
    /// Phase applied at start-up when the Hall reading is undefined
    pub startup_phase: u8,
}

impl ControllerConfig {
    pub const fn new() -> Self {
        Self {
            pole_constant: DEFAULT_POLE_CONSTANT,
            initial_delay_us: DEFAULT_COMMUTATION_DELAY_US,
            delay_step_us: DELAY_STEP_US,
            stall_threshold: DEFAULT_STALL_THRESHOLD,
            debounce_samples: DEFAULT_DEBOUNCE_SAMPLES,
            startup_phase: DEFAULT_STARTUP_PHASE,
        }
    }

    /// 全パラメータを検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pole_constant == 0 {
            return Err(ConfigError::ZeroPoleConstant);
        }
        CommutationDelay::try_new(self.initial_delay_us)?;
        if self.delay_step_us == 0 {
            return Err(ConfigError::ZeroDelayStep);
        }
        if self.stall_threshold == 0 {
            return Err(ConfigError::ZeroStallThreshold);
        }
        if self.debounce_samples == 0 {
            return Err(ConfigError::ZeroDebounceSamples);
        }
        self.startup_phase()?;
        Ok(())
    }

    pub fn startup_phase(&self) -> Result<ElectricalPhase, ConfigError> {
        ElectricalPhase::new(self.startup_phase)
            .ok_or(ConfigError::InvalidStartupPhase(self.startup_phase))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}

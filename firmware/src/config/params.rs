//! コントローラとボードの設定パラメータ

use hall_bldc::config::{
    ControllerConfig, DEFAULT_COMMUTATION_DELAY_US, DEFAULT_DEBOUNCE_SAMPLES, DELAY_STEP_US,
};

/// モーター制御パラメータ
///
/// RPM = Hz × 60 / pole_constant。起動時のHallコードが不定ならフェーズ1へキック
pub const CONTROLLER: ControllerConfig = ControllerConfig {
    pole_constant: 4,
    initial_delay_us: DEFAULT_COMMUTATION_DELAY_US,
    delay_step_us: DELAY_STEP_US,
    stall_threshold: 3,
    debounce_samples: DEFAULT_DEBOUNCE_SAMPLES,
    startup_phase: 1,
};

/// 速度サンプリング周期 [ms]（周波数 = 1秒あたりのエッジ数）
pub const SPEED_SAMPLE_PERIOD_MS: u64 = 1_000;

/// メインループ周期 [ms]（ボタンサンプリング）
pub const PANEL_PERIOD_MS: u64 = 10;

/// テレメトリ出力間隔 [メインループ周期数]（10ms × 100 = 1秒）
pub const TELEMETRY_LOG_INTERVAL: u32 = 100;

/// LED更新周期 [ms]
pub const LED_PERIOD_MS: u64 = 500;

/// イベントキューの深さ
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Hallピン番号（GPIOB）
pub mod hall {
    pub const H1_PIN: usize = 6;
    pub const H2_PIN: usize = 7;
    pub const H3_PIN: usize = 8;
}

/// 巻線出力のピン番号（GPIOE）: (drive, enable)
///
/// 6本すべて同一ポートなのでBSRR 1回で同時に更新できる
pub mod winding {
    pub const W1: (usize, usize) = (9, 8);
    pub const W2: (usize, usize) = (11, 10);
    pub const W3: (usize, usize) = (13, 12);
    pub const ALL: [(usize, usize); 3] = [W1, W2, W3];
}

/// 周波数入力フィルタ（TIM2 ETRデジタルフィルタ）
pub mod edge_counter {
    use embassy_stm32::pac::timer::vals::FilterValue;

    pub const INPUT_FILTER: FilterValue = FilterValue::FCK_INT_N8;
}

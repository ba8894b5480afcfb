//! メインループ（ボタン入力とテレメトリ出力）
//!
//! 10msごとにボタンをサンプリングし、押下エッジを制御タスクへ送ります。
//! 1秒ごとに周波数・回転数・転流遅延をログへ出力します。

use embassy_stm32::gpio::Input;
use embassy_time::{Duration, Timer};
use hall_bldc::{ButtonPanel, Event};

use crate::config::{CONTROLLER, PANEL_PERIOD_MS, TELEMETRY_LOG_INTERVAL};
use crate::state::{EVENTS, TELEMETRY};

/// メインループ
///
/// # 引数
/// * `increase` - 遅延増加ボタン（アクティブLow）
/// * `decrease` - 遅延減少ボタン（アクティブLow）
pub async fn run(increase: Input<'static>, decrease: Input<'static>) -> ! {
    let mut panel = ButtonPanel::new(CONTROLLER.debounce_samples);
    let mut ticks: u32 = 0;

    loop {
        for button in panel
            .sample(increase.is_low(), decrease.is_low())
            .into_iter()
            .flatten()
        {
            if EVENTS.try_send(Event::ButtonEdge(button)).is_err() {
                warn!("Event queue full, {:?} dropped", button);
            }
        }

        ticks += 1;
        if ticks >= TELEMETRY_LOG_INTERVAL {
            ticks = 0;
            let snapshot = *TELEMETRY.lock().await;
            info!("Frequency: {} (Hz)", snapshot.frequency_hz);
            info!("RPM: {}", snapshot.rpm);
            info!("WaitTime: {}", snapshot.commutation_delay_us);
            debug!(
                "Phase: {}, commutations: {}, undefined hall codes: {}",
                snapshot.phase.index(),
                snapshot.commutations,
                snapshot.undefined_hall_codes
            );
        }

        Timer::after(Duration::from_millis(PANEL_PERIOD_MS)).await;
    }
}

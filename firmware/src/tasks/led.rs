//! LED表示タスク
//!
//! LED1: ハートビート、LED2: 失速、LED3: Hall不定コード

use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};

use crate::config::LED_PERIOD_MS;
use crate::state::TELEMETRY;

/// LED表示タスク
#[embassy_executor::task]
pub async fn led_task(
    mut led1: Output<'static>,
    mut led2: Output<'static>,
    mut led3: Output<'static>,
) {
    info!("LED task started");

    loop {
        let snapshot = *TELEMETRY.lock().await;

        led1.toggle();
        led2.set_level(snapshot.stalled.into());
        led3.set_level(snapshot.hall_fault.into());

        Timer::after(Duration::from_millis(LED_PERIOD_MS)).await;
    }
}

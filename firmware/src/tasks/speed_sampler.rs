//! 速度サンプリングタスク
//!
//! 1秒ごとにTIM2のエッジ数を読み取り、制御タスクへ渡します。
//! 送信は待たないので、窓の境界は制御タスクの処理状況に左右されません。

use embassy_time::{Duration, Ticker};
use hall_bldc::Event;

use crate::config::SPEED_SAMPLE_PERIOD_MS;
use crate::edge_counter;
use crate::state::EVENTS;

#[embassy_executor::task]
pub async fn speed_sampler_task() {
    info!("Speed sampler started ({}ms window)", SPEED_SAMPLE_PERIOD_MS);

    let mut ticker = Ticker::every(Duration::from_millis(SPEED_SAMPLE_PERIOD_MS));
    // 起動直後の半端な窓を捨てる
    edge_counter::read_and_reset();

    loop {
        ticker.next().await;
        let edges = edge_counter::read_and_reset();
        if EVENTS.try_send(Event::TimerTick { edges }).is_err() {
            warn!("Event queue full, speed sample dropped ({} edges)", edges);
        }
    }
}

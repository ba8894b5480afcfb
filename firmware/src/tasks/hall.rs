//! Hallエッジ検出タスク
//!
//! 3本のHall入力のいずれかにエッジが来たら、3本をまとめて読み直して制御タスクへ渡します。

use embassy_futures::select::select3;
use embassy_stm32::exti::ExtiInput;
use hall_bldc::{HallReading, HallTracker};

use crate::hardware;
use crate::state::HALL;

/// Hallエッジ検出タスク
///
/// どの線のエッジかは区別しません。フェーズは常に3本同時の読み取りから決まります。
/// 前回の読み取りから再アームまでの間に動いたレベルは、アーム直後の再読み取りで拾います。
#[embassy_executor::task]
pub async fn hall_task(
    mut h1: ExtiInput<'static>,
    mut h2: ExtiInput<'static>,
    mut h3: ExtiInput<'static>,
    initial: HallReading,
) {
    info!("Hall task started");

    let mut tracker = HallTracker::new(initial);

    loop {
        {
            // futureの生成時点でEXTIがアームされる
            let edge = select3(
                h1.wait_for_any_edge(),
                h2.wait_for_any_edge(),
                h3.wait_for_any_edge(),
            );
            if !tracker.is_stale(hardware::read_hall_lines()) {
                edge.await;
            }
        }

        if let Some(reading) = tracker.changed(hardware::read_hall_lines()) {
            trace!("Hall edge: code={}", reading.code());
            HALL.signal(reading);
        }
    }
}

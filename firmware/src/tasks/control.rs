//! 転流制御タスク
//!
//! Hall読み取りとイベントキューの唯一の消費者です。コントローラの状態はこのタスクだけが所有し、
//! 1イベントごとにテレメトリスナップショットを公開します。

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use hall_bldc::{ControllerConfig, Event, HallReading, MotorController, PendingCommutation};

use crate::config::CONTROLLER;
use crate::motor_driver::GpioPhaseDriver;
use crate::state::{EVENTS, HALL, TELEMETRY};

type Controller = MotorController<GpioPhaseDriver>;

/// 転流制御タスク
///
/// # 引数
/// * `driver` - 巻線出力
/// * `initial` - 起動時のHall読み取り
#[embassy_executor::task]
pub async fn control_task(driver: GpioPhaseDriver, initial: HallReading) {
    let config = match CONTROLLER.validate() {
        Ok(()) => CONTROLLER,
        Err(e) => {
            error!("Invalid controller configuration: {:?}, using defaults", e);
            ControllerConfig::default()
        }
    };

    let mut controller = match MotorController::new(driver, &config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Failed to create motor controller: {:?}", e);
            return;
        }
    };

    info!("Control task started");

    // 起動キック
    let pending = controller.start(initial);
    commutate(&mut controller, pending).await;
    publish(&controller).await;

    loop {
        match select(HALL.wait(), EVENTS.receive()).await {
            Either::First(reading) => {
                if let Some(pending) = controller.handle(Event::HallEdge(reading)) {
                    commutate(&mut controller, pending).await;
                }
            }
            Either::Second(event) => handle_queued(&mut controller, event),
        }

        publish(&controller).await;
    }
}

/// デッドタイム待機後に転流を確定
///
/// 待機中も速度サンプルとボタンエッジは処理します。待機中に来たHall読み取りは
/// [`HALL`] に最新の1件だけが残り、確定後に処理されます。
async fn commutate(controller: &mut Controller, pending: PendingCommutation) {
    let deadline =
        Instant::now() + Duration::from_micros(u64::from(pending.dead_time().as_micros()));

    while let Either::Second(event) = select(Timer::at(deadline), EVENTS.receive()).await {
        handle_queued(controller, event);
        publish(controller).await;
    }

    controller.commit(pending);
}

/// キュー経由のイベントは転流を伴わない
fn handle_queued(controller: &mut Controller, event: Event) {
    if let Some(pending) = controller.handle(event) {
        warn!("Unexpected commutation from queued event: {:?}", pending);
    }
}

async fn publish(controller: &Controller) {
    *TELEMETRY.lock().await = controller.snapshot();
}

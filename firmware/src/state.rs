//! グローバル共有状態管理
//!
//! Hallの読み取りは [`HALL`] に上書きで、速度サンプルとボタンエッジは [`EVENTS`] に積まれ、
//! 制御タスクだけが取り出します。コントローラの状態は制御タスクが単独で所有し、
//! 他のタスクは [`TELEMETRY`] のコピーを読むだけです。

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, ThreadModeRawMutex};
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use hall_bldc::{Event, HallReading, TelemetrySnapshot};

use crate::config::EVENT_QUEUE_DEPTH;

/// 最新のHall読み取り（未処理の古い読み取りは上書きされる）
pub static HALL: Signal<CriticalSectionRawMutex, HallReading> = Signal::new();

/// 速度サンプル・ボタンエッジのイベントキュー
pub static EVENTS: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH> = Channel::new();

/// 最新のテレメトリスナップショット（制御タスクが更新）
pub static TELEMETRY: Mutex<ThreadModeRawMutex, TelemetrySnapshot> =
    Mutex::new(TelemetrySnapshot::new());

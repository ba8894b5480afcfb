//! タスクモジュール
//!
//! 各タスクの実装を分離して管理します。

pub mod control;
pub mod hall;
pub mod led;
pub mod panel;
pub mod speed_sampler;

// タスク関数を再エクスポート
pub use control::control_task;
pub use hall::hall_task;
pub use led::led_task;
pub use speed_sampler::speed_sampler_task;

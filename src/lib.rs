//! Hall-sensored six-step BLDC commutation core
//!
//! ハードウェア非依存のコアロジック。Hallデコード、転流テーブル、デッドタイム付き転流、
//! 1秒窓の速度推定、ボタンによる転流遅延調整をイベント駆動のステートマシンとしてまとめます。
//! ファームウェア側（`firmware/`）は割り込み・タイマーを [`controller::Event`] に変換して
//! [`controller::MotorController`] に渡すだけです。

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod commutator;
pub mod config;
pub mod controller;
pub mod delay;
pub mod hall;
pub mod phase;
pub mod sim;
pub mod speed;
pub mod telemetry;

pub use commutator::{PendingCommutation, PhaseCommutator, PhaseDriver};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{Event, MotorController};
pub use delay::{Button, ButtonPanel, CommutationDelay, DelayController};
pub use hall::{HallDecoder, HallError, HallReading, HallTracker};
pub use phase::{ElectricalPhase, OutputPair, OutputPattern, WindingState};
pub use speed::{SpeedEstimator, SpeedMeasurement};
pub use telemetry::TelemetrySnapshot;

//! Configuration module
//!
//! ボード固有のタイミングとコントローラ設定をまとめます。

pub mod params;

// params.rsから主要な定数を再エクスポート
pub use params::*;

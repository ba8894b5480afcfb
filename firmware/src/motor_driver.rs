//! 6ステップ出力段ドライバー
//!
//! 3巻線 × (drive, enable) の6本をGPIOEに配置し、
//! 転流パターンをBSRRへの1回の書き込みで同時に反映します。

use embassy_stm32::gpio::Output;
use embassy_stm32::pac;
use hall_bldc::{OutputPattern, PhaseDriver};

use crate::config::winding;

/// GPIO直結の3巻線ドライバー
///
/// ピンの所有権は`Output`で保持し、実際の出力更新はPACでまとめて行います。
pub struct GpioPhaseDriver {
    _pins: [Output<'static>; 6],
}

impl GpioPhaseDriver {
    /// 新しいドライバーを作成
    ///
    /// # 引数
    /// * `pins` - W1 drive/enable, W2 drive/enable, W3 drive/enable の順（すべてGPIOE、初期値Low）
    pub fn new(pins: [Output<'static>; 6]) -> Self {
        Self { _pins: pins }
    }
}

impl PhaseDriver for GpioPhaseDriver {
    fn write(&mut self, pattern: &OutputPattern) {
        // BSRRはset/resetを1サイクルで適用するため中間状態は現れない
        pac::GPIOE.bsrr().write(|w| {
            for ((drive, enable), pair) in winding::ALL.into_iter().zip(pattern) {
                if pair.drive {
                    w.set_bs(drive, true);
                } else {
                    w.set_br(drive, true);
                }
                if pair.enable {
                    w.set_bs(enable, true);
                } else {
                    w.set_br(enable, true);
                }
            }
        });
    }
}

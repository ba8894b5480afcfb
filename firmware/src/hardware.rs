//! ハードウェア初期化モジュール
//!
//! ペリフェラルの初期化ロジックを集約します。

use embassy_stm32::pac;
use embassy_stm32::Config;
use hall_bldc::HallReading;

use crate::config::hall::{H1_PIN, H2_PIN, H3_PIN};
use crate::edge_counter;

/// RCCクロック設定を初期化
///
/// HSI → PLL（÷4 × 85 ÷ 2）で170MHz生成
pub fn create_clock_config() -> Config {
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::{Pll, PllMul, PllPreDiv, PllRDiv, PllSource, Sysclk};

        config.rcc.hsi = true;
        config.rcc.pll = Some(Pll {
            source: PllSource::HSI,
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL85,
            divp: None,
            divq: None,
            divr: Some(PllRDiv::DIV2),
        });
        config.rcc.sys = Sysclk::PLL1_R; // システムクロックをPLLに設定
    }
    config
}

/// TIM2 周波数入力カウンタ初期化
///
/// PA0=TIM2_ETR（外部クロックモード2）
///
/// # Safety
/// PACを使用した直接レジスタ操作を含む
pub unsafe fn init_frequency_input() {
    info!("Initializing TIM2 edge counter (ETR, external clock mode 2)...");
    edge_counter::init_edge_counter();
    info!("TIM2 edge counter initialized");
}

/// Hall 3本をIDRの1回の読み取りでサンプリング
///
/// PB6=H1、PB7=H2、PB8=H3
#[inline(always)]
pub fn read_hall_lines() -> HallReading {
    let idr = pac::GPIOB.idr().read();
    HallReading::new(
        idr.idr(H1_PIN) as u8 != 0,
        idr.idr(H2_PIN) as u8 != 0,
        idr.idr(H3_PIN) as u8 != 0,
    )
}

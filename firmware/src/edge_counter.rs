//! TIM2ベースの周波数入力エッジカウンタ
//!
//! 回転に比例した周波数信号をTIM2の外部クロックモード2（ETR入力）で数えます。
//! CPUはエッジごとに割り込まれず、サンプリング周期の境界でカウンタを読むだけです。
//!
//! ## ハードウェア構成
//! - TIM2_ETR (PA0, AF14): 周波数入力
//! - 32bitフリーランカウンタ（差分はラップアラウンドを考慮）

use core::sync::atomic::{AtomicU32, Ordering};
use embassy_stm32::pac;

use crate::config::edge_counter::INPUT_FILTER;

const INPUT_PIN: usize = 0;
const INPUT_AF: u8 = 14;

/// 前回読み取り時点のカウンタ値
static WINDOW_START: AtomicU32 = AtomicU32::new(0);

/// TIM2 外部クロックモード2 の初期化
///
/// # Safety
/// PACを使用した直接的なレジスタ操作を含むため、unsafe
pub unsafe fn init_edge_counter() {
    let rcc = pac::RCC;
    let tim2 = pac::TIM2;
    let gpioa = pac::GPIOA;

    // 1. クロック有効化
    rcc.ahb2enr().modify(|w| w.set_gpioaen(true)); // GPIOA
    rcc.apb1enr1().modify(|w| w.set_tim2en(true)); // TIM2

    // 2. PA0をAF14 (TIM2_ETR) に設定
    gpioa
        .moder()
        .modify(|w| w.set_moder(INPUT_PIN, pac::gpio::vals::Moder::ALTERNATE));
    gpioa.afr(0).modify(|w| w.set_afr(INPUT_PIN, INPUT_AF));
    gpioa
        .pupdr()
        .modify(|w| w.set_pupdr(INPUT_PIN, pac::gpio::vals::Pupdr::FLOATING));

    // 3. TIM2設定
    tim2.cr1().modify(|w| w.set_cen(false));
    tim2.psc().write_value(0);
    tim2.arr().write_value(u32::MAX);

    // 4. 外部クロックモード2: ETRの立ち上がりエッジでカウント
    tim2.smcr().modify(|w| {
        w.set_ece(true);
        w.set_etp(pac::timer::vals::Etp::NOT_INVERTED);
        w.set_etps(pac::timer::vals::Etps::DIV1);
        w.set_etf(INPUT_FILTER);
    });

    // 5. カウンタをリセットして開始
    tim2.cnt().write_value(0);
    WINDOW_START.store(0, Ordering::Relaxed);
    tim2.egr().write(|w| w.set_ug(true));
    tim2.cr1().modify(|w| w.set_cen(true));
}

/// 前回の呼び出し以降のエッジ数を返し、窓を次へ進める
///
/// カウンタ自体は止めずに差分を取るため、窓の境界でエッジを取りこぼしません。
#[inline(always)]
pub fn read_and_reset() -> u32 {
    let now = pac::TIM2.cnt().read();
    let start = WINDOW_START.swap(now, Ordering::Relaxed);
    now.wrapping_sub(start)
}

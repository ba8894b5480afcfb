//! テレメトリスナップショット
//!
//! メインループが毎周期読み出す読み取り専用のコピーです。
//! 文字列化や送信は呼び出し側の責務です。

use crate::phase::ElectricalPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySnapshot {
    /// 出力に印加中のフェーズ
    pub phase: ElectricalPhase,
    /// 直近1秒窓のエッジ周波数 [Hz]
    pub frequency_hz: u32,
    /// 直近1秒窓の回転数 [RPM]
    pub rpm: u32,
    /// 現在の転流遅延 [μs]
    pub commutation_delay_us: u32,
    /// 連続ゼロサンプルによる失速判定
    pub stalled: bool,
    /// 直近のHall読み取りが不定コードだったか
    pub hall_fault: bool,
    /// 不定Hallコードの累計
    pub undefined_hall_codes: u32,
    /// 転流回数の累計
    pub commutations: u32,
}

impl TelemetrySnapshot {
    /// 起動直後（転流前・サンプル前）の値
    pub const fn new() -> Self {
        Self {
            phase: ElectricalPhase::ALL[0],
            frequency_hz: 0,
            rpm: 0,
            commutation_delay_us: 0,
            stalled: false,
            hall_fault: false,
            undefined_hall_codes: 0,
            commutations: 0,
        }
    }
}

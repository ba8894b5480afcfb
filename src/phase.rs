//! 電気角フェーズと6ステップ転流テーブル
//!
//! 各フェーズで3巻線のうち1本をHigh、1本をLow、1本をフローティングにします。
//! 出力は巻線ごとに (drive, enable) の2本で、PWMではなくGPIOレベルで駆動します。

/// Electrical commutation step, always in 0..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElectricalPhase(u8);

impl ElectricalPhase {
    /// Number of electrical steps per electrical revolution
    pub const COUNT: u8 = 6;

    /// All six phases in table order
    pub const ALL: [Self; 6] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
    ];

    /// Returns `None` for indices outside 0..=5
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Next step in the forward sequence (5 wraps to 0)
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % Self::COUNT)
    }
}

/// 1巻線分の出力ライン（ドライブレベル + イネーブル）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputPair {
    /// ハイサイド/ローサイド選択（true = High）
    pub drive: bool,
    /// ドライバ有効（false = フローティング）
    pub enable: bool,
}

/// 巻線の電気的な状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindingState {
    High,
    Low,
    Floating,
}

impl OutputPair {
    pub const fn new(drive: bool, enable: bool) -> Self {
        Self { drive, enable }
    }

    pub const fn state(self) -> WindingState {
        match (self.enable, self.drive) {
            (false, _) => WindingState::Floating,
            (true, true) => WindingState::High,
            (true, false) => WindingState::Low,
        }
    }
}

/// Output levels for windings 1..3
pub type OutputPattern = [OutputPair; 3];

const fn pair(drive: u8, enable: u8) -> OutputPair {
    OutputPair::new(drive != 0, enable != 0)
}

/// 転流テーブル（フェーズ → 3巻線の出力）
///
/// | phase | W1  | W2  | W3  |
/// |-------|-----|-----|-----|
/// | 0     | H   | L   | -   |
/// | 1     | -   | L   | H   |
/// | 2     | L   | -   | H   |
/// | 3     | L   | H   | -   |
/// | 4     | -   | H   | L   |
/// | 5     | H   | -   | L   |
pub const COMMUTATION_TABLE: [OutputPattern; 6] = [
    [pair(1, 1), pair(0, 1), pair(0, 0)],
    [pair(0, 0), pair(0, 1), pair(1, 1)],
    [pair(0, 1), pair(0, 0), pair(1, 1)],
    [pair(0, 1), pair(1, 1), pair(0, 0)],
    [pair(0, 0), pair(1, 1), pair(0, 1)],
    [pair(1, 1), pair(0, 0), pair(0, 1)],
];

/// Table lookup for a phase
#[inline(always)]
pub const fn pattern(phase: ElectricalPhase) -> OutputPattern {
    COMMUTATION_TABLE[phase.0 as usize]
}

//! 速度推定
//!
//! 回転に比例した周波数信号のエッジ数を1秒ごとにサンプリングし、周波数とRPMを求めます。
//! 値は最後に完了した1秒窓のもの（平均化・補間なし）です。

/// Result of one completed sampling window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedMeasurement {
    /// Edges counted in the window [Hz]
    pub frequency_hz: u32,
    /// Mechanical speed derived from `frequency_hz`
    pub rpm: u32,
}

/// Edge-count speed estimator with stall detection
pub struct SpeedEstimator {
    /// RPM = Hz × 60 / pole_constant
    pole_constant: u32,
    /// Latest completed window
    latest: SpeedMeasurement,
    /// Consecutive windows with zero edges
    zero_streak: u32,
    /// Zero windows needed before reporting a stall
    stall_threshold: u32,
    /// Completed windows since power-on
    samples: u32,
}

impl SpeedEstimator {
    /// # Arguments
    /// * `pole_constant` - モーター固有の換算定数（0は1として扱う）
    /// * `stall_threshold` - 失速とみなす連続ゼロサンプル数
    pub fn new(pole_constant: u32, stall_threshold: u8) -> Self {
        Self {
            pole_constant: pole_constant.max(1),
            latest: SpeedMeasurement::default(),
            zero_streak: 0,
            stall_threshold: u32::from(stall_threshold.max(1)),
            samples: 0,
        }
    }

    /// Convert an edge count to frequency and RPM
    #[inline(always)]
    pub fn measure(edges: u32, pole_constant: u32) -> SpeedMeasurement {
        let rpm = u64::from(edges) * 60 / u64::from(pole_constant.max(1));
        SpeedMeasurement {
            frequency_hz: edges,
            rpm: u32::try_from(rpm).unwrap_or(u32::MAX),
        }
    }

    /// Record the edge count read at a window boundary
    ///
    /// # Returns
    /// The measurement for the window that just closed
    pub fn sample(&mut self, edges: u32) -> SpeedMeasurement {
        let was_stalled = self.is_stalled();

        self.latest = Self::measure(edges, self.pole_constant);
        self.samples = self.samples.wrapping_add(1);

        if edges == 0 {
            self.zero_streak = self.zero_streak.saturating_add(1);
        } else {
            self.zero_streak = 0;
        }

        match (was_stalled, self.is_stalled()) {
            (false, true) => warn!(
                "Rotor stalled: no edges for {} consecutive periods",
                self.zero_streak
            ),
            (true, false) => info!("Rotor turning again: {} Hz", edges),
            _ => {}
        }

        trace!(
            "Speed sample: {} Hz, {} RPM",
            self.latest.frequency_hz,
            self.latest.rpm
        );

        self.latest
    }

    /// Latest completed measurement (last value wins)
    pub fn latest(&self) -> SpeedMeasurement {
        self.latest
    }

    pub fn is_stalled(&self) -> bool {
        self.zero_streak >= self.stall_threshold
    }

    pub fn zero_streak(&self) -> u32 {
        self.zero_streak
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn pole_constant(&self) -> u32 {
        self.pole_constant
    }
}

// Hall sensor decoding for six-step commutation
// Maps the 3-bit H1/H2/H3 code to one of six electrical phases

use crate::phase::ElectricalPhase;

/// Marker for codes that have no phase (all sensors low / all high)
const INVALID: u8 = 255;

/// Hall code lookup table
/// Index is the raw code `H1<<2 | H2<<1 | H3`
/// Forward sequence: 101 -> 001 -> 011 -> 010 -> 110 -> 100 -> 101
const HALL_PHASE_TABLE: [u8; 8] = [
    INVALID, // 0b000: sensor fault / disconnected
    2,       // 0b001
    4,       // 0b010
    3,       // 0b011
    0,       // 0b100
    1,       // 0b101
    5,       // 0b110
    INVALID, // 0b111: sensor fault / disconnected
];

/// Instantaneous level of the three Hall lines, sampled together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HallReading {
    pub h1: bool,
    pub h2: bool,
    pub h3: bool,
}

impl HallReading {
    pub const fn new(h1: bool, h2: bool, h3: bool) -> Self {
        Self { h1, h2, h3 }
    }

    /// Build a reading from a raw code (only the low three bits are used)
    pub const fn from_code(code: u8) -> Self {
        Self {
            h1: code & 0b100 != 0,
            h2: code & 0b010 != 0,
            h3: code & 0b001 != 0,
        }
    }

    /// Raw 3-bit code, H1 in the most significant position
    pub const fn code(self) -> u8 {
        ((self.h1 as u8) << 2) | ((self.h2 as u8) << 1) | (self.h3 as u8)
    }
}

/// Hallデコードのエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HallError {
    /// 全センサーLow (0b000) または全センサーHigh (0b111)
    UndefinedCode(u8),
}

/// Pure table decode of a Hall reading
pub fn decode(reading: HallReading) -> Result<ElectricalPhase, HallError> {
    let code = reading.code();
    match HALL_PHASE_TABLE[code as usize] {
        INVALID => Err(HallError::UndefinedCode(code)),
        index => ElectricalPhase::new(index).ok_or(HallError::UndefinedCode(code)),
    }
}

/// Hall decoder holding the last valid phase
///
/// Undefined codes never move the held phase. They are counted and raise
/// `fault()` until the next valid reading arrives.
#[derive(Debug, Clone)]
pub struct HallDecoder {
    /// Last successfully decoded phase
    phase: ElectricalPhase,
    /// Raw code of the most recent reading
    last_code: u8,
    /// Set while the most recent reading was undefined
    fault: bool,
    /// Total undefined readings seen (saturating)
    undefined_codes: u32,
}

impl HallDecoder {
    pub const fn new() -> Self {
        Self {
            phase: ElectricalPhase::ALL[0],
            last_code: 0,
            fault: false,
            undefined_codes: 0,
        }
    }

    /// Decode a reading taken on a Hall edge
    ///
    /// # Returns
    /// The new phase for a valid code. For an undefined code the held
    /// phase is left untouched and the error is returned, so the caller
    /// must not commutate.
    pub fn update(&mut self, reading: HallReading) -> Result<ElectricalPhase, HallError> {
        self.last_code = reading.code();

        match decode(reading) {
            Ok(phase) => {
                if self.fault {
                    info!("Hall code valid again: {} -> phase {}", self.last_code, phase.index());
                }
                self.fault = false;
                self.phase = phase;
                Ok(phase)
            }
            Err(e) => {
                self.undefined_codes = self.undefined_codes.saturating_add(1);
                if !self.fault {
                    warn!(
                        "Undefined hall code {}, holding phase {}",
                        self.last_code,
                        self.phase.index()
                    );
                }
                self.fault = true;
                Err(e)
            }
        }
    }

    /// Currently held phase
    pub fn phase(&self) -> ElectricalPhase {
        self.phase
    }

    pub fn last_code(&self) -> u8 {
        self.last_code
    }

    pub fn fault(&self) -> bool {
        self.fault
    }

    pub fn undefined_codes(&self) -> u32 {
        self.undefined_codes
    }
}

impl Default for HallDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the last Hall reading handed to the controller
///
/// Edge interrupts only fire once they are armed, so the lines are sampled
/// again right after arming. A level that moved in between is reported
/// through [`HallTracker::changed`] instead of waiting for the next edge.
#[derive(Debug, Clone, Copy)]
pub struct HallTracker {
    sent: HallReading,
}

impl HallTracker {
    /// # Arguments
    /// * `initial` - 起動時に転流へ使った読み取り
    pub const fn new(initial: HallReading) -> Self {
        Self { sent: initial }
    }

    /// `true` when `current` differs from what was last sent
    pub fn is_stale(&self, current: HallReading) -> bool {
        current.code() != self.sent.code()
    }

    /// Record `current` and return it if it has to be sent
    ///
    /// A glitch that returns to the sent code yields `None`.
    pub fn changed(&mut self, current: HallReading) -> Option<HallReading> {
        if self.is_stale(current) {
            self.sent = current;
            Some(current)
        } else {
            None
        }
    }

    pub fn sent(&self) -> HallReading {
        self.sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_of(code: u8) -> Option<u8> {
        decode(HallReading::from_code(code)).ok().map(|p| p.index())
    }

    #[test]
    fn test_reading_code_roundtrip() {
        let reading = HallReading::new(true, false, true);
        assert_eq!(reading.code(), 0b101);
        assert_eq!(HallReading::from_code(0b101), reading);
        assert_eq!(HallReading::from_code(0b1111_0110).code(), 0b110);
    }

    #[test]
    fn test_documented_codes() {
        assert_eq!(phase_of(0b101), Some(1));
        assert_eq!(phase_of(0b001), Some(2));
        assert_eq!(phase_of(0b011), Some(3));
        assert_eq!(phase_of(0b010), Some(4));
        assert_eq!(phase_of(0b110), Some(5));
        assert_eq!(phase_of(0b100), Some(0));
    }

    #[test]
    fn test_undefined_codes() {
        assert_eq!(
            decode(HallReading::from_code(0b000)),
            Err(HallError::UndefinedCode(0b000))
        );
        assert_eq!(
            decode(HallReading::from_code(0b111)),
            Err(HallError::UndefinedCode(0b111))
        );
    }

    #[test]
    fn test_decode_is_independent_of_history() {
        // 同じコードは直前の状態に関係なく同じフェーズになる
        let mut decoder = HallDecoder::new();
        for first in [0b101, 0b011, 0b110] {
            decoder.update(HallReading::from_code(first)).ok();
            let phase = decoder.update(HallReading::from_code(0b010)).unwrap();
            assert_eq!(phase.index(), 4);
        }
    }

    #[test]
    fn test_undefined_code_holds_phase() {
        let mut decoder = HallDecoder::new();
        decoder.update(HallReading::from_code(0b011)).unwrap();
        assert_eq!(decoder.phase().index(), 3);

        for code in [0b000, 0b111] {
            assert!(decoder.update(HallReading::from_code(code)).is_err());
            assert_eq!(decoder.phase().index(), 3);
            assert!(decoder.fault());
        }
        assert_eq!(decoder.undefined_codes(), 2);

        decoder.update(HallReading::from_code(0b010)).unwrap();
        assert!(!decoder.fault());
        assert_eq!(decoder.phase().index(), 4);
    }

    #[test]
    fn test_forward_sequence() {
        let mut decoder = HallDecoder::new();
        let codes = [0b101, 0b001, 0b011, 0b010, 0b110, 0b100, 0b101];
        let phases: [u8; 7] = codes.map(|c| decoder.update(HallReading::from_code(c)).unwrap().index());
        assert_eq!(phases, [1, 2, 3, 4, 5, 0, 1]);
    }

    #[test]
    fn test_tracker_reports_level_moved_before_arming() {
        let mut tracker = HallTracker::new(HallReading::from_code(0b101));

        // 読み取り後・再アーム前にエッジが来た場合
        let rearmed = HallReading::from_code(0b001);
        assert!(tracker.is_stale(rearmed));
        assert_eq!(tracker.changed(rearmed), Some(rearmed));
        assert!(!tracker.is_stale(rearmed));
        assert_eq!(tracker.sent(), rearmed);
    }

    #[test]
    fn test_tracker_ignores_glitch_back_to_sent_code() {
        let mut tracker = HallTracker::new(HallReading::from_code(0b011));
        assert_eq!(tracker.changed(HallReading::from_code(0b011)), None);

        tracker.changed(HallReading::from_code(0b010));
        assert_eq!(tracker.changed(HallReading::from_code(0b010)), None);
        assert_eq!(tracker.sent().code(), 0b010);
    }
}

use serde::{Deserialize, Serialize};

/// An eco score between 0 and 10 inclusive, 10 being the lowest footprint per dollar.
///
/// Every constructor clamps, so a value of this type is always in range.
///
/// # Examples
///
/// ```
/// use storage::models::EcoScore;
///
/// assert_eq!(EcoScore::clamped(14).value(), 10);
/// assert_eq!(EcoScore::clamped(-3).value(), 0);
/// assert_eq!(EcoScore::NEUTRAL.value(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct EcoScore(u8);

impl EcoScore {
    pub const MIN: EcoScore = EcoScore(0);
    pub const MAX: EcoScore = EcoScore(10);
    /// Used whenever there is nothing to score.
    pub const NEUTRAL: EcoScore = EcoScore(5);

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 10) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_i16(self) -> i16 {
        i16::from(self.0)
    }
}

impl From<EcoScore> for u8 {
    fn from(score: EcoScore) -> Self {
        score.0
    }
}

impl TryFrom<u8> for EcoScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 10 {
            Ok(Self(value))
        } else {
            Err(format!("eco score {} is outside 0..=10", value))
        }
    }
}

impl std::fmt::Display for EcoScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_out_of_range_values() {
        assert_eq!(EcoScore::clamped(11), EcoScore::MAX);
        assert_eq!(EcoScore::clamped(i64::MIN), EcoScore::MIN);
        assert_eq!(EcoScore::clamped(7).value(), 7);
    }

    #[test]
    fn test_try_from_rejects_scores_above_ten() {
        assert!(EcoScore::try_from(10).is_ok());
        assert!(EcoScore::try_from(11).is_err());
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("{:>6}", EcoScore::clamped(7)), "     7");
        assert_eq!(format!("{:<3}|", EcoScore::MAX), "10 |");
    }
}

use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Minimum detector score, held as a whole percentage in [10, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ConfidenceThreshold(u8);

impl ConfidenceThreshold {
    pub const MIN_PERCENT: u8 = 10;
    pub const MAX_PERCENT: u8 = 100;
    pub const DEFAULT_PERCENT: u8 = 50;

    pub fn from_percent(percent: u8) -> DomainResult<Self> {
        if !(Self::MIN_PERCENT..=Self::MAX_PERCENT).contains(&percent) {
            return Err(DomainError::InvalidInput(format!(
                "confidence must be between {} and {} percent, got {percent}",
                Self::MIN_PERCENT,
                Self::MAX_PERCENT
            )));
        }
        Ok(Self(percent))
    }

    /// Parses form or query text such as `"35"`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let percent = raw
            .trim()
            .parse::<u8>()
            .map_err(|_| DomainError::InvalidInput(format!("confidence is not a percentage: {raw:?}")))?;
        Self::from_percent(percent)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn as_fraction(self) -> f32 {
        self.0 as f32 / 100.0
    }
}

impl Default for ConfidenceThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT_PERCENT)
    }
}

impl TryFrom<u8> for ConfidenceThreshold {
    type Error = DomainError;

    fn try_from(value: u8) -> DomainResult<Self> {
        Self::from_percent(value)
    }
}

impl From<ConfidenceThreshold> for u8 {
    fn from(value: ConfidenceThreshold) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds_and_rejects_outside() {
        assert_eq!(ConfidenceThreshold::from_percent(10).unwrap().as_fraction(), 0.10);
        assert_eq!(ConfidenceThreshold::from_percent(100).unwrap().as_fraction(), 1.0);
        assert!(ConfidenceThreshold::from_percent(9).is_err());
        assert!(ConfidenceThreshold::from_percent(101).is_err());
    }

    #[test]
    fn parses_form_text() {
        assert_eq!(ConfidenceThreshold::parse(" 35 ").unwrap().percent(), 35);
        assert!(ConfidenceThreshold::parse("abc").is_err());
        assert!(ConfidenceThreshold::parse("-5").is_err());
    }

    #[test]
    fn defaults_to_half() {
        assert_eq!(ConfidenceThreshold::default().percent(), 50);
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: ConfidenceThreshold = serde_json::from_str("40").unwrap();
        assert_eq!(ok.percent(), 40);
        assert!(serde_json::from_str::<ConfidenceThreshold>("5").is_err());
    }
}

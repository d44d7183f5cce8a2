//! The quality tier enumeration and its bounded transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Quality tier for rendering and tracking configuration.
///
/// Tiers are ordered: `Low < Medium < High`. Transitions move at most one
/// step at a time and are bounded below by [`QualityTier::Low`] and above
/// by a ceiling fixed when the controller is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Minimum settings for constrained devices.
    Low,
    /// Balanced settings, the mobile default.
    Medium,
    /// Full settings for capable hardware.
    High,
}

impl QualityTier {
    /// Step one tier down, saturating at [`QualityTier::Low`].
    pub fn step_down(self) -> Self {
        match self {
            QualityTier::High => QualityTier::Medium,
            QualityTier::Medium | QualityTier::Low => QualityTier::Low,
        }
    }

    /// Step one tier up, saturating at `ceiling`.
    ///
    /// The ceiling is the highest tier the device's capability profile
    /// allows; low-end devices never climb past their initial tier.
    pub fn step_up(self, ceiling: QualityTier) -> Self {
        let raised = match self {
            QualityTier::Low => QualityTier::Medium,
            QualityTier::Medium | QualityTier::High => QualityTier::High,
        };
        raised.min(ceiling)
    }

    /// Short name used in logs and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            other => Err(format!("unknown quality tier: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_down_saturates_at_low() {
        assert_eq!(QualityTier::High.step_down(), QualityTier::Medium);
        assert_eq!(QualityTier::Medium.step_down(), QualityTier::Low);
        assert_eq!(QualityTier::Low.step_down(), QualityTier::Low);
    }

    #[test]
    fn test_step_up_respects_ceiling() {
        assert_eq!(QualityTier::Low.step_up(QualityTier::High), QualityTier::Medium);
        assert_eq!(QualityTier::Medium.step_up(QualityTier::High), QualityTier::High);
        assert_eq!(QualityTier::High.step_up(QualityTier::High), QualityTier::High);

        // A low-end ceiling pins the tier in place.
        assert_eq!(QualityTier::Low.step_up(QualityTier::Low), QualityTier::Low);
        assert_eq!(QualityTier::Medium.step_up(QualityTier::Medium), QualityTier::Medium);
    }

    #[test]
    fn test_ordering() {
        assert!(QualityTier::Low < QualityTier::Medium);
        assert!(QualityTier::Medium < QualityTier::High);
    }

    #[test]
    fn test_from_str_round_trip() {
        for tier in [QualityTier::Low, QualityTier::Medium, QualityTier::High] {
            assert_eq!(tier.as_str().parse::<QualityTier>().unwrap(), tier);
        }
        assert!("ultra".parse::<QualityTier>().is_err());
    }
}

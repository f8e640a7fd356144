use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::NO_DATA_LABEL;

/// Air quality tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityLevel {
    Good,
    Acceptable,
    Bad,
    VeryBad,
    ExtremelyBad,
}

/// Health risk tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl QualityLevel {
    pub const ALL: [QualityLevel; 5] = [
        QualityLevel::Good,
        QualityLevel::Acceptable,
        QualityLevel::Bad,
        QualityLevel::VeryBad,
        QualityLevel::ExtremelyBad,
    ];

    /// Tiers that trigger an alert email
    pub const CRITICAL: [QualityLevel; 3] = [
        QualityLevel::Bad,
        QualityLevel::VeryBad,
        QualityLevel::ExtremelyBad,
    ];

    pub fn from_tier(tier: usize) -> Self {
        Self::ALL[tier.min(Self::ALL.len() - 1)]
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Good => "Buena",
            QualityLevel::Acceptable => "Aceptable",
            QualityLevel::Bad => "Mala",
            QualityLevel::VeryBad => "Muy mala",
            QualityLevel::ExtremelyBad => "Extremadamente mala",
        }
    }

    pub fn is_critical(&self) -> bool {
        Self::CRITICAL.contains(self)
    }

    /// Badge emoji and background colour used in alert emails
    pub fn badge(&self) -> (&'static str, &'static str) {
        match self {
            QualityLevel::Good => ("🟢", "#2e7d32"),
            QualityLevel::Acceptable => ("🟡", "#fbc02d"),
            QualityLevel::Bad => ("🟠", "#fb8c00"),
            QualityLevel::VeryBad => ("🔴", "#e53935"),
            QualityLevel::ExtremelyBad => ("🟣", "#8e24aa"),
        }
    }
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::VeryHigh,
        RiskLevel::Extreme,
    ];

    pub fn from_tier(tier: usize) -> Self {
        Self::ALL[tier.min(Self::ALL.len() - 1)]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Bajo",
            RiskLevel::Moderate => "Moderado",
            RiskLevel::High => "Alto",
            RiskLevel::VeryHigh => "Muy alto",
            RiskLevel::Extreme => "Extremo",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for QualityLevel {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.label() == s.trim())
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Unknown quality label: '{}'", s)))
    }
}

impl FromStr for RiskLevel {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.label() == s.trim())
            .ok_or_else(|| ProcessingError::InvalidFormat(format!("Unknown risk label: '{}'", s)))
    }
}

/// Quality and risk tiers for one reading. Both are `None` when the
/// reading carried no usable index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub quality: Option<QualityLevel>,
    pub risk: Option<RiskLevel>,
}

impl Classification {
    pub fn no_data() -> Self {
        Self {
            quality: None,
            risk: None,
        }
    }

    pub fn quality_label(&self) -> &'static str {
        self.quality.map_or(NO_DATA_LABEL, |q| q.label())
    }

    pub fn risk_label(&self) -> &'static str {
        self.risk.map_or(NO_DATA_LABEL, |r| r.label())
    }

    pub fn is_critical(&self) -> bool {
        self.quality.is_some_and(|q| q.is_critical())
    }
}

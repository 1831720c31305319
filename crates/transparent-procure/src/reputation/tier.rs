use serde::Serialize;

/// Three-band label callers attach to a reputation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    #[serde(rename = "High (Blacklist Warning)")]
    High,
}

impl RiskTier {
    pub const fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Low
        } else if score >= 50 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High (Blacklist Warning)",
        }
    }
}

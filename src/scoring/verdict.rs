use super::engine::Factors;
use super::ladder::{Breakpoint, Ladder};
use serde::{Serialize, Serializer};

/// Resale priority tier derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Low,
    Medium,
    Good,
    Excellent,
}

const TIERS: Ladder<Tier> = Ladder {
    steps: &[
        (Breakpoint::AtLeast(80.0), Tier::Excellent),
        (Breakpoint::AtLeast(65.0), Tier::Good),
        (Breakpoint::AtLeast(50.0), Tier::Medium),
    ],
    fallback: Tier::Low,
};

impl Tier {
    pub fn from_score(total: f64) -> Self {
        TIERS.lookup(total)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "EXCELLENT - high priority",
            Tier::Good => "GOOD - worth considering",
            Tier::Medium => "MEDIUM - evaluate further",
            Tier::Low => "LOW - not recommended",
        }
    }

    /// Compact marker for tables.
    pub fn marker(&self) -> &'static str {
        match self {
            Tier::Excellent => "***",
            Tier::Good => "**",
            Tier::Medium => "*",
            Tier::Low => "-",
        }
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Guidance text for a scored listing.
pub fn recommend(total: f64, factors: &Factors) -> String {
    if total >= 80.0 {
        return "Great resale opportunity! Popular gear, good price and strong interest.".to_string();
    }

    if total >= 65.0 {
        let mut reasons = Vec::new();
        if factors.brand >= 20.0 {
            reasons.push("strong brand");
        }
        if factors.price >= 20.0 {
            reasons.push("competitive price");
        }
        if factors.interest >= 20.0 {
            reasons.push("high interest");
        }
        return if reasons.is_empty() {
            "Reasonable resale opportunity.".to_string()
        } else {
            format!("Worth considering for {}.", reasons.join(" and "))
        };
    }

    if total >= 50.0 {
        let mut warnings = Vec::new();
        if factors.price < 15.0 {
            warnings.push("high price");
        }
        if factors.condition < 15.0 {
            warnings.push("questionable condition");
        }
        if factors.interest < 10.0 {
            warnings.push("low interest");
        }
        return if warnings.is_empty() {
            "Average opportunity. Evaluate other factors.".to_string()
        } else {
            format!("Caution: {}. Evaluate carefully.", warnings.join(" and "))
        };
    }

    "Not recommended for resale right now.".to_string()
}

/// One line per factor: name, a block per full 5 points, value out of 25.
pub fn render_breakdown(factors: &Factors) -> String {
    factors
        .iter()
        .map(|(name, value)| {
            let bars = "█".repeat((value / 5.0).floor().max(0.0) as usize);
            format!("{}: {} {:.1}/25", name, bars, value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

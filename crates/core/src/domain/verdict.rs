use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::Reject => "REJECT",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule of the acceptance policy produced the verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBranch {
    MeetsBatna,
    WithinCounterTolerance,
    BelowThresholds,
}

impl DecisionBranch {
    pub fn verdict(self) -> Verdict {
        match self {
            Self::MeetsBatna | Self::WithinCounterTolerance => Verdict::Accept,
            Self::BelowThresholds => Verdict::Reject,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MeetsBatna => "meets_batna",
            Self::WithinCounterTolerance => "within_counter_tolerance",
            Self::BelowThresholds => "below_thresholds",
        }
    }
}

/// The three scores an incoming offer is judged on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferContext {
    pub offer_value: Decimal,
    pub batna_value: Decimal,
    pub counter_value: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accept: bool,
    pub action: Verdict,
    pub branch: DecisionBranch,
    pub reason: String,
}

impl Evaluation {
    pub fn new(branch: DecisionBranch, reason: String) -> Self {
        let action = branch.verdict();
        Self { accept: action == Verdict::Accept, action, branch, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecisionBranch, Evaluation, Verdict};

    #[test]
    fn verdict_serializes_as_required_names() {
        assert_eq!(serde_json::to_string(&Verdict::Accept).expect("json"), "\"ACCEPT\"");
        assert_eq!(serde_json::to_string(&Verdict::Reject).expect("json"), "\"REJECT\"");
    }

    #[test]
    fn accept_flag_mirrors_action() {
        let accepted = Evaluation::new(DecisionBranch::WithinCounterTolerance, String::new());
        assert!(accepted.accept);
        assert_eq!(accepted.action, Verdict::Accept);

        let rejected = Evaluation::new(DecisionBranch::BelowThresholds, String::new());
        assert!(!rejected.accept);
        assert_eq!(rejected.action, Verdict::Reject);
    }
}

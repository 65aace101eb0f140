//! Registration outcome.

use serde::{Deserialize, Serialize};

/// Result of a registration attempt.
///
/// The backend either answers the request (`Outcome`) or rejects it with a
/// message (`Rejected`). A rejection is not an error for the caller: it
/// commonly describes a scheduling conflict and may be retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The backend answered; `true` means the registration took.
    Outcome(bool),
    /// The call failed; the message says why.
    Rejected(String),
}

impl ApplyOutcome {
    /// True only for `Outcome(true)`.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Outcome(true))
    }

    /// Rejection message, if any.
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) => Some(message),
            Self::Outcome(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_only_for_true_outcome() {
        assert!(ApplyOutcome::Outcome(true).is_registered());
        assert!(!ApplyOutcome::Outcome(false).is_registered());
        assert!(!ApplyOutcome::Rejected("CONFLICT".into()).is_registered());
    }

    #[test]
    fn rejection_message_is_exposed() {
        let outcome = ApplyOutcome::Rejected("time CONFLICT".into());
        assert_eq!(outcome.rejection(), Some("time CONFLICT"));
        assert_eq!(ApplyOutcome::Outcome(true).rejection(), None);
    }
}

//! Status and method enums for the checkout flow.

use serde::{Deserialize, Serialize};

/// Payment method selected for a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment via the tokenization processor.
    #[default]
    Card,
    /// Out-of-band QR payment confirmed through a separate channel.
    Qr,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Qr => write!(f, "qr"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "qr" => Ok(Self::Qr),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Submission status of a checkout session.
///
/// Transitions: `Idle` -> `Processing` -> (`Succeeded` | `Failed`);
/// `Failed` -> `Processing` on resubmit. `Succeeded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// No submission in flight; submit is permitted.
    #[default]
    Idle,
    /// A submission is in flight; further submits are rejected.
    Processing,
    /// Payment completed; the session is terminal.
    Succeeded,
    /// The last submission failed; resubmit is permitted.
    Failed,
}

impl SubmissionStatus {
    /// Whether a new submission may start from this status.
    #[must_use]
    pub const fn can_submit(self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "processing" => Ok(Self::Processing),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid submission status: {s}")),
        }
    }
}

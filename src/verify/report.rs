use std::fmt;

use crate::mx::MxRecord;

use super::reason::Reason;
use super::score::confidence;
use super::session::{Disposition, SessionOutcome};

/// Final categorisation of an address. `Unknown` covers transport-level
/// failures where the exchange could not be interrogated at all.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Deliverable,
    Undeliverable,
    Risky,
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deliverable => "deliverable",
            Self::Undeliverable => "undeliverable",
            Self::Risky => "risky",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The externally visible outcome of one verification. Produced exactly once
/// per request by one of the constructors below, each covering a terminal
/// state with every field populated.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub result: Verdict,
    pub success: bool,
    pub smtp_ok: bool,
    pub mx_found: bool,
    pub mx_records: Vec<MxRecord>,
    pub reason: Reason,
    pub role: bool,
    pub disposable: bool,
    pub valid_format: bool,
    pub score: f64,
}

impl VerificationResult {
    /// The address failed format validation; no I/O was performed.
    pub(crate) fn invalid_format(role: bool, disposable: bool) -> Self {
        Self {
            result: Verdict::Undeliverable,
            success: false,
            smtp_ok: false,
            mx_found: false,
            mx_records: Vec::new(),
            reason: Reason::InvalidEmail,
            role,
            disposable,
            valid_format: false,
            score: confidence(false, false, false, role, disposable),
        }
    }

    /// The MX lookup itself failed; no connection was attempted.
    pub(crate) fn domain_not_found(role: bool, disposable: bool) -> Self {
        Self::unresolved(Reason::InvalidDomain, role, disposable)
    }

    /// The lookup succeeded but the domain publishes no MX records; no
    /// connection was attempted.
    pub(crate) fn no_mx_records(role: bool, disposable: bool) -> Self {
        Self::unresolved(Reason::InvalidMxRecord, role, disposable)
    }

    fn unresolved(reason: Reason, role: bool, disposable: bool) -> Self {
        Self {
            result: Verdict::Undeliverable,
            success: false,
            smtp_ok: false,
            mx_found: false,
            mx_records: Vec::new(),
            reason,
            role,
            disposable,
            valid_format: true,
            score: confidence(true, false, false, role, disposable),
        }
    }

    /// A session ran against the selected exchange; fold its disposition and
    /// the resolved record set into the verdict.
    pub(crate) fn from_session(
        outcome: &SessionOutcome,
        mx_records: Vec<MxRecord>,
        role: bool,
        disposable: bool,
    ) -> Self {
        let accepted = outcome.accepted();
        let (result, reason) = match &outcome.disposition {
            Disposition::Accepted => (Verdict::Deliverable, Reason::AcceptedEmail),
            Disposition::Rejected { retryable, .. } => {
                let reason = if *retryable {
                    Reason::TransientSmtpFailure
                } else {
                    Reason::FailedReceivedEmail
                };
                (Verdict::Undeliverable, reason)
            }
            Disposition::TimedOut => (Verdict::Risky, Reason::Timeout),
            Disposition::Unavailable { .. } => (Verdict::Unknown, Reason::UnavailableSmtp),
        };

        Self {
            result,
            success: accepted,
            smtp_ok: accepted,
            mx_found: true,
            mx_records,
            reason,
            role,
            disposable,
            valid_format: true,
            score: confidence(true, true, accepted, role, disposable),
        }
    }
}

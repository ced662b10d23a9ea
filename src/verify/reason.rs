use std::fmt;

/// Canonical reason strings attached to every verdict. One internal status
/// per terminal state; `as_str` is the user-facing rendering.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// The address failed format validation.
    InvalidEmail,
    /// The MX lookup failed (NXDOMAIN or resolver trouble).
    InvalidDomain,
    /// The lookup succeeded but the domain publishes no MX records.
    InvalidMxRecord,
    /// The session deadline elapsed before a terminal state was reached.
    Timeout,
    /// Transport-level failure (connect, read or write).
    UnavailableSmtp,
    /// The exchange accepted the recipient probe.
    AcceptedEmail,
    /// The handshake completed or aborted without acceptance.
    FailedReceivedEmail,
    /// The exchange greeted with a transient busy code (421/450/451);
    /// retrying later may succeed.
    TransientSmtpFailure,
    /// Fallback for states the table does not cover.
    UnexpectedError,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::InvalidDomain => "invalid_domain",
            Self::InvalidMxRecord => "invalid_mx_record",
            Self::Timeout => "timeout",
            Self::UnavailableSmtp => "unavailable_smtp",
            Self::AcceptedEmail => "accepted_email",
            Self::FailedReceivedEmail => "failed_received_email",
            Self::TransientSmtpFailure => "transient_smtp_failure",
            Self::UnexpectedError => "unexpected_error",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_snake_case_strings() {
        assert_eq!(Reason::InvalidEmail.as_str(), "invalid_email");
        assert_eq!(Reason::FailedReceivedEmail.as_str(), "failed_received_email");
        assert_eq!(Reason::AcceptedEmail.to_string(), "accepted_email");
    }
}

use std::time::Duration;

/// Configuration for a verification attempt. All fields have defaults; an
/// explicit `timeout_ms` of 0 means "use the built-in fallback".
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// TCP port for the mail-transfer connection.
    pub port: u16,
    /// Address used in `MAIL FROM`.
    pub sender: String,
    /// Per-session timeout in milliseconds; 0 falls back to 5000 ms.
    pub timeout_ms: u64,
    /// Client hostname used in `EHLO`.
    pub fqdn: String,
    /// Substring that, if present in the `RCPT TO` reply, counts as acceptance.
    pub ignore: Option<String>,
    /// DNS server override ("ip" or "ip:port" entries) for the MX lookup.
    pub dns: Option<Vec<String>>,
}

pub(crate) const FALLBACK_TIMEOUT_MS: u64 = 5_000;

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            port: 25,
            sender: "name@example.org".to_string(),
            timeout_ms: 0,
            fqdn: "mail.example.org".to_string(),
            ignore: None,
            dns: None,
        }
    }
}

impl VerifyOptions {
    /// The deadline budget for the whole SMTP session. A zero `timeout_ms`
    /// keeps the fallback; there is no way to disable the timeout.
    pub fn session_timeout(&self) -> Duration {
        if self.timeout_ms == 0 {
            Duration::from_millis(FALLBACK_TIMEOUT_MS)
        } else {
            Duration::from_millis(self.timeout_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = VerifyOptions::default();
        assert_eq!(options.port, 25);
        assert_eq!(options.sender, "name@example.org");
        assert_eq!(options.timeout_ms, 0);
        assert_eq!(options.fqdn, "mail.example.org");
        assert_eq!(options.ignore, None);
        assert_eq!(options.dns, None);
    }

    #[test]
    fn zero_timeout_uses_fallback() {
        let options = VerifyOptions::default();
        assert_eq!(options.session_timeout(), Duration::from_millis(5_000));

        let options = VerifyOptions {
            timeout_ms: 2_000,
            ..VerifyOptions::default()
        };
        assert_eq!(options.session_timeout(), Duration::from_millis(2_000));
    }
}

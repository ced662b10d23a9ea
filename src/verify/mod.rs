//! Deliverability verification: entry points, pipeline wiring and verdict
//! composition.
//!
//! Control flow is strictly linear per address: format validation, MX
//! resolution, a single SMTP session against the selected exchange, then
//! scoring. Invalid format and missing MX short-circuit before any network
//! or TCP work respectively. Exactly one [`VerificationResult`] is produced
//! per call that gets past configuration checks.

mod disposable;
mod error;
mod machine;
mod options;
mod reason;
mod report;
mod role;
mod score;
mod session;

pub use disposable::is_disposable_address;
pub use error::VerifyError;
pub use options::VerifyOptions;
pub use reason::Reason;
pub use report::{VerificationResult, Verdict};
pub use role::is_role_account;

use tracing::info;

use crate::mx::{self, LookupMx, MxResolution};
use crate::validator::{NormalizedEmail, ValidationMode, normalize_email};

/// Verify `email` with default options.
pub fn verify_email(email: &str) -> Result<VerificationResult, VerifyError> {
    verify_email_with_options(email, &VerifyOptions::default())
}

/// Verify `email`. Configuration problems (missing address, invalid DNS
/// override) error synchronously; every later failure mode folds into the
/// returned [`VerificationResult`].
pub fn verify_email_with_options(
    email: &str,
    options: &VerifyOptions,
) -> Result<VerificationResult, VerifyError> {
    if email.trim().is_empty() {
        return Err(VerifyError::MissingEmail);
    }

    let normalized = normalize_email(email, ValidationMode::Strict)
        .map_err(|source| VerifyError::Email { source })?;

    info!(email = %normalized.original.trim(), "verifying address");

    let role = is_role_account(&normalized.local);
    let disposable = is_disposable_address(disposable_target(&normalized));

    if !normalized.valid {
        info!(reasons = ?normalized.reasons, "address failed format validation");
        return Ok(VerificationResult::invalid_format(role, disposable));
    }

    let resolver = mx::build_resolver(options.dns.as_deref())?;
    verify_with_lookup(&normalized, options, &resolver, role, disposable)
}

/// Resolution and session against an injectable resolver; the seam the tests
/// drive with a stub.
pub(crate) fn verify_with_lookup<R: LookupMx>(
    normalized: &NormalizedEmail,
    options: &VerifyOptions,
    resolver: &R,
    role: bool,
    disposable: bool,
) -> Result<VerificationResult, VerifyError> {
    let domain = effective_domain(normalized);
    let resolution = mx::resolve_with(resolver, domain)?;

    let Some(selected) = resolution.selected() else {
        return Ok(match &resolution {
            MxResolution::NoRecords => VerificationResult::no_mx_records(role, disposable),
            _ => VerificationResult::domain_not_found(role, disposable),
        });
    };

    let recipient = format!("{}@{}", normalized.local, domain);
    let outcome = session::probe_exchange(&selected.exchange, options, &recipient);
    Ok(VerificationResult::from_session(
        &outcome,
        resolution.records().to_vec(),
        role,
        disposable,
    ))
}

fn effective_domain(normalized: &NormalizedEmail) -> &str {
    if normalized.ascii_domain.is_empty() {
        // valid addresses always carry an ASCII domain; lowercased form is a
        // fallback for direct callers
        &normalized.domain
    } else {
        &normalized.ascii_domain
    }
}

fn disposable_target(normalized: &NormalizedEmail) -> &str {
    if normalized.ascii_domain.is_empty() {
        &normalized.original
    } else {
        &normalized.ascii_domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mx::tests::StubResolver;
    use crate::mx::{LookupOutcome, MxRecord};
    use std::io::{self, BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn normalized(email: &str) -> NormalizedEmail {
        normalize_email(email, ValidationMode::Strict).expect("normalize")
    }

    fn options_for_port(port: u16) -> VerifyOptions {
        VerifyOptions {
            port,
            timeout_ms: 2_000,
            ..VerifyOptions::default()
        }
    }

    fn loopback_resolver() -> StubResolver {
        StubResolver::with_records(vec![MxRecord::new(10, "127.0.0.1")])
    }

    fn spawn_mock_server(
        banner: &'static str,
        script: Vec<(&'static str, &'static str)>,
    ) -> (u16, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("addr").port();
        let (ready_tx, ready_rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            ready_tx.send(()).ok();
            if let Ok((mut stream, _)) = listener.accept() {
                let _ = handle_session(&mut stream, banner, script);
            }
        });
        ready_rx.recv().expect("server ready");
        (port, handle)
    }

    fn handle_session(
        stream: &mut TcpStream,
        banner: &'static str,
        script: Vec<(&'static str, &'static str)>,
    ) -> io::Result<()> {
        let mut reader = BufReader::new(stream.try_clone()?);
        stream.write_all(banner.as_bytes())?;
        stream.flush()?;
        for (expected, response) in script {
            let mut line = String::new();
            reader.read_line(&mut line)?;
            assert!(
                line.starts_with(expected),
                "expected command starting with '{expected}', got '{line}'"
            );
            stream.write_all(response.as_bytes())?;
            stream.flush()?;
        }
        Ok(())
    }

    #[test]
    fn empty_address_raises_configuration_error() {
        let err = verify_email_with_options("   ", &VerifyOptions::default()).expect_err("fail");
        assert!(matches!(err, VerifyError::MissingEmail));
    }

    #[test]
    fn invalid_dns_override_fails_fast() {
        let options = VerifyOptions {
            dns: Some(vec!["not an ip".to_string()]),
            ..VerifyOptions::default()
        };
        let err = verify_email_with_options("user@example.com", &options).expect_err("fail");
        assert!(matches!(
            err,
            VerifyError::Mx(crate::mx::Error::DnsOverride { .. })
        ));
    }

    #[test]
    fn malformed_address_short_circuits_without_io() {
        // the DNS override is broken too, but format validation wins first
        let options = VerifyOptions {
            dns: Some(vec!["not an ip".to_string()]),
            ..VerifyOptions::default()
        };
        let result =
            verify_email_with_options("admin@not a domain", &options).expect("verdict");
        assert_eq!(result.result, Verdict::Undeliverable);
        assert_eq!(result.reason, Reason::InvalidEmail);
        assert!(!result.success);
        assert!(!result.valid_format);
        assert!(!result.mx_found);
        assert!(result.role, "role flag computed even for invalid addresses");
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn no_mx_records_skips_session() {
        let resolver = StubResolver::new(|_| LookupOutcome::Empty);
        let result = verify_with_lookup(
            &normalized("user@example.com"),
            &VerifyOptions::default(),
            &resolver,
            false,
            false,
        )
        .expect("verdict");
        assert_eq!(result.result, Verdict::Undeliverable);
        assert_eq!(result.reason, Reason::InvalidMxRecord);
        assert!(!result.mx_found);
        assert!(result.mx_records.is_empty());
    }

    #[test]
    fn failed_lookup_reports_invalid_domain() {
        let resolver = StubResolver::new(|_| LookupOutcome::Failed("nxdomain".to_string()));
        let result = verify_with_lookup(
            &normalized("user@no-such-domain.invalid"),
            &VerifyOptions::default(),
            &resolver,
            false,
            false,
        )
        .expect("verdict");
        assert_eq!(result.reason, Reason::InvalidDomain);
        assert!(!result.mx_found);
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn accepts_recipient_via_full_handshake() {
        let (port, handle) = spawn_mock_server(
            "220 mock.smtp.test ESMTP\r\n",
            vec![
                ("EHLO", "250-mock.example\r\n250 SIZE 35882577\r\n"),
                ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
                ("RCPT TO:", "250 2.1.5 Ok\r\n"),
                ("QUIT", "221 2.0.0 Bye\r\n"),
            ],
        );
        let result = verify_with_lookup(
            &normalized("user@example.com"),
            &options_for_port(port),
            &loopback_resolver(),
            false,
            false,
        )
        .expect("verdict");
        assert_eq!(result.result, Verdict::Deliverable);
        assert!(result.success);
        assert!(result.smtp_ok);
        assert!(result.mx_found);
        assert_eq!(result.reason, Reason::AcceptedEmail);
        assert!((result.score - 1.0).abs() < 1e-9);
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn rejected_recipient_reports_failed_received() {
        let (port, handle) = spawn_mock_server(
            "220 mock.smtp.test ESMTP\r\n",
            vec![
                ("EHLO", "250 mock.example\r\n"),
                ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
                ("RCPT TO:", "550 5.1.1 User unknown\r\n"),
                ("QUIT", "221 2.0.0 Bye\r\n"),
            ],
        );
        let result = verify_with_lookup(
            &normalized("user@example.com"),
            &options_for_port(port),
            &loopback_resolver(),
            false,
            false,
        )
        .expect("verdict");
        assert_eq!(result.result, Verdict::Undeliverable);
        assert!(!result.success);
        assert!(result.mx_found);
        assert_eq!(result.reason, Reason::FailedReceivedEmail);
        assert_eq!(result.reason.as_str(), "failed_received_email");
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn ignore_substring_counts_as_acceptance() {
        let (port, handle) = spawn_mock_server(
            "220 mock.smtp.test ESMTP\r\n",
            vec![
                ("EHLO", "250 mock.example\r\n"),
                ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
                ("RCPT TO:", "450 4.2.1 greylisted, try later\r\n"),
                ("QUIT", "221 2.0.0 Bye\r\n"),
            ],
        );
        let options = VerifyOptions {
            ignore: Some("greylisted".to_string()),
            ..options_for_port(port)
        };
        let result = verify_with_lookup(
            &normalized("user@example.com"),
            &options,
            &loopback_resolver(),
            false,
            false,
        )
        .expect("verdict");
        assert_eq!(result.result, Verdict::Deliverable);
        assert!(result.smtp_ok);
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn busy_greeting_surfaces_transient_reason() {
        let (port, handle) =
            spawn_mock_server("421 4.3.2 Service not available\r\n", Vec::new());
        let result = verify_with_lookup(
            &normalized("user@example.com"),
            &options_for_port(port),
            &loopback_resolver(),
            false,
            false,
        )
        .expect("verdict");
        assert_eq!(result.result, Verdict::Undeliverable);
        assert_eq!(result.reason, Reason::TransientSmtpFailure);
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn silent_server_times_out_as_risky() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("addr").port();
        let handle = thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                // never greet; hold the connection past the client deadline
                thread::sleep(Duration::from_millis(800));
                drop(stream);
            }
        });
        let options = VerifyOptions {
            timeout_ms: 250,
            ..options_for_port(port)
        };
        let result = verify_with_lookup(
            &normalized("user@example.com"),
            &options,
            &loopback_resolver(),
            false,
            false,
        )
        .expect("verdict");
        assert_eq!(result.result, Verdict::Risky);
        assert!(!result.success);
        assert_eq!(result.reason, Reason::Timeout);
        assert!((result.score - 0.32).abs() < 1e-9);
        handle.join().expect("server thread");
    }
}

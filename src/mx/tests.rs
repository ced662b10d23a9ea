use super::{Error, MxRecord, MxResolution, resolver};
use resolver::{LookupMx, LookupOutcome};

type LookupFn = dyn Fn(&str) -> LookupOutcome;

pub(crate) struct StubResolver {
    pub on_lookup: Box<LookupFn>,
}

impl StubResolver {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> LookupOutcome + 'static,
    {
        Self {
            on_lookup: Box::new(f),
        }
    }

    pub(crate) fn with_records(records: Vec<MxRecord>) -> Self {
        Self::new(move |_| LookupOutcome::Records(records.clone()))
    }
}

impl LookupMx for StubResolver {
    fn lookup_mx(&self, domain: &str) -> LookupOutcome {
        (self.on_lookup)(domain)
    }
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = resolver::normalize_domain("  ").expect_err("empty domain should fail");
    assert!(matches!(err, Error::EmptyDomain));
}

#[test]
fn resolve_with_keeps_resolution_order() {
    let stub = StubResolver::new(|domain| {
        assert_eq!(domain, "example.com");
        LookupOutcome::Records(vec![
            MxRecord::new(20, "mx2.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(30, "mx3.example.com"),
        ])
    });

    let resolution = resolver::resolve_with(&stub, "example.com").expect("lookup succeeds");
    assert!(resolution.found());
    let records = resolution.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].exchange, "mx2.example.com");
    assert_eq!(records[1].exchange, "mx1.example.com");
}

#[test]
fn selection_prefers_lowest_preference() {
    let resolution = MxResolution::Records(vec![
        MxRecord::new(20, "mx-a.example.com"),
        MxRecord::new(5, "mx-b.example.com"),
        MxRecord::new(15, "mx-c.example.com"),
    ]);
    let selected = resolution.selected().expect("record selected");
    assert_eq!(selected.preference, 5);
    assert_eq!(selected.exchange, "mx-b.example.com");
}

#[test]
fn selection_tie_resolves_to_first_seen() {
    let resolution = MxResolution::Records(vec![
        MxRecord::new(10, "first.example.com"),
        MxRecord::new(10, "second.example.com"),
    ]);
    assert_eq!(
        resolution.selected().expect("record selected").exchange,
        "first.example.com"
    );
}

#[test]
fn resolve_with_handles_empty_lookup() {
    let stub = StubResolver::new(|_| LookupOutcome::Empty);
    let resolution = resolver::resolve_with(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(resolution, MxResolution::NoRecords);
    assert!(!resolution.found());
    assert!(resolution.selected().is_none());
}

#[test]
fn resolve_with_handles_failed_lookup() {
    let stub = StubResolver::new(|_| LookupOutcome::Failed("nxdomain".to_string()));
    let resolution = resolver::resolve_with(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(resolution, MxResolution::DomainNotFound);
    assert!(!resolution.found());
}

#[test]
fn resolve_with_normalizes_unicode_domain() {
    let stub = StubResolver::new(|domain| {
        assert_eq!(domain, "xn--exmple-cua.com");
        LookupOutcome::Empty
    });
    resolver::resolve_with(&stub, "exämple.com").expect("lookup succeeds");
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = resolver::normalize_exchange("Mail.EXAMPLE.com.".to_string());
    assert_eq!(out, "mail.example.com");
}

#[test]
fn parse_dns_servers_accepts_bare_ip_and_ip_port() {
    let specs = vec!["8.8.8.8".to_string(), "1.1.1.1:5353".to_string()];
    let addrs = resolver::parse_dns_servers(&specs).expect("valid servers");
    assert_eq!(addrs[0].port(), 53);
    assert_eq!(addrs[1].port(), 5353);
}

#[test]
fn parse_dns_servers_rejects_garbage() {
    let specs = vec!["not-an-ip".to_string()];
    let err = resolver::parse_dns_servers(&specs).expect_err("must fail");
    assert!(matches!(err, Error::DnsOverride { .. }));
}

#[test]
fn build_resolver_fails_fast_on_bad_override() {
    let specs = vec!["definitely wrong".to_string()];
    let err = resolver::build_resolver(Some(&specs)).err().expect("must fail");
    assert!(matches!(err, Error::DnsOverride { .. }));
}

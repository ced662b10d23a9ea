use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tracing::{debug, info};
use trust_dns_resolver::Resolver;
use trust_dns_resolver::config::{
    NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts,
};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::proto::op::ResponseCode;

use super::{Error, MxRecord, MxResolution};

const DNS_PORT: u16 = 53;

/// Lookup MX records for `domain` using the system resolver.
///
/// The domain is normalized via IDNA before querying DNS. Lookup failures are
/// folded into [`MxResolution::DomainNotFound`] rather than raised; only
/// configuration-time problems (empty domain, IDNA, resolver setup) error.
pub fn resolve_mx(domain: &str) -> Result<MxResolution, Error> {
    let resolver = build_resolver(None)?;
    resolve_with(&resolver, domain)
}

pub(crate) fn resolve_with<R>(resolver: &R, domain: &str) -> Result<MxResolution, Error>
where
    R: LookupMx,
{
    let ascii = normalize_domain(domain)?;
    debug!(domain = %ascii, "resolving MX records");

    let resolution = match resolver.lookup_mx(&ascii) {
        LookupOutcome::Records(records) => MxResolution::Records(records),
        LookupOutcome::Empty => {
            info!(domain = %ascii, "MX lookup returned no records");
            MxResolution::NoRecords
        }
        LookupOutcome::Failed(message) => {
            info!(domain = %ascii, %message, "MX lookup failed");
            MxResolution::DomainNotFound
        }
    };

    if let Some(selected) = resolution.selected() {
        info!(
            exchange = %selected.exchange,
            preference = selected.preference,
            "selected mail exchange"
        );
    }
    Ok(resolution)
}

/// Build a resolver from the system configuration, or from an explicit server
/// list ("ip" or "ip:port" entries). An unparseable entry fails before any
/// network attempt.
pub(crate) fn build_resolver(servers: Option<&[String]>) -> Result<Resolver, Error> {
    match servers {
        None => Resolver::from_system_conf().map_err(Error::resolver_init),
        Some(specs) => {
            let addrs = parse_dns_servers(specs)?;
            let group: NameServerConfigGroup = addrs
                .into_iter()
                .map(|addr| NameServerConfig::new(addr, Protocol::Udp))
                .collect::<Vec<_>>()
                .into();
            let config = ResolverConfig::from_parts(None, Vec::new(), group);
            Resolver::new(config, ResolverOpts::default()).map_err(Error::resolver_init)
        }
    }
}

pub(crate) fn parse_dns_servers(specs: &[String]) -> Result<Vec<SocketAddr>, Error> {
    if specs.is_empty() {
        return Err(Error::dns_override("<empty list>"));
    }
    specs
        .iter()
        .map(|spec| {
            let trimmed = spec.trim();
            if let Ok(ip) = IpAddr::from_str(trimmed) {
                return Ok(SocketAddr::new(ip, DNS_PORT));
            }
            SocketAddr::from_str(trimmed).map_err(|_| Error::dns_override(trimmed))
        })
        .collect()
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}

/// What a single MX query produced.
pub(crate) enum LookupOutcome {
    Records(Vec<MxRecord>),
    Empty,
    Failed(String),
}

/// Query seam, implemented by the real resolver and by the test stub.
pub(crate) trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> LookupOutcome;
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> LookupOutcome {
        match Resolver::mx_lookup(self, domain) {
            Ok(lookup) => {
                let records = lookup
                    .iter()
                    .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
                    .collect::<Vec<_>>();
                if records.is_empty() {
                    LookupOutcome::Empty
                } else {
                    LookupOutcome::Records(records)
                }
            }
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { response_code, .. }
                    if *response_code != ResponseCode::NXDomain =>
                {
                    LookupOutcome::Empty
                }
                _ => LookupOutcome::Failed(err.to_string()),
            },
        }
    }
}

use phf::phf_set;

/// Domains of well-known throwaway mailbox providers.
static DISPOSABLE_DOMAINS: phf::Set<&'static str> = phf_set! {
    "0-mail.com",
    "10minutemail.com",
    "10minutemail.net",
    "1secmail.com",
    "1secmail.net",
    "1secmail.org",
    "33mail.com",
    "anonbox.net",
    "burnermail.io",
    "discard.email",
    "dispostable.com",
    "emailondeck.com",
    "fakeinbox.com",
    "getnada.com",
    "grr.la",
    "guerrillamail.com",
    "guerrillamail.net",
    "guerrillamail.org",
    "guerrillamailblock.com",
    "inboxkitten.com",
    "maildrop.cc",
    "mailinator.com",
    "mailnesia.com",
    "mintemail.com",
    "moakt.com",
    "mohmal.com",
    "mytemp.email",
    "pokemail.net",
    "sharklasers.com",
    "spam4.me",
    "spamgourmet.com",
    "temp-mail.io",
    "temp-mail.org",
    "tempmail.dev",
    "tempmailo.com",
    "tempr.email",
    "throwawaymail.com",
    "trashmail.com",
    "trashmail.de",
    "yopmail.com",
    "yopmail.fr",
    "yopmail.net",
};

/// Providers that hand out arbitrary subdomains; any domain below these
/// counts as disposable.
static WILDCARD_SUFFIXES: &[&str] = &[
    ".1secmail.com",
    ".33mail.com",
    ".guerrillamail.com",
    ".mailinator.com",
    ".spamgourmet.com",
    ".yopmail.com",
];

/// True when the address (or bare domain) belongs to a disposable provider.
pub fn is_disposable_address(domain_or_email: &str) -> bool {
    let domain = domain_or_email
        .rsplit('@')
        .next()
        .unwrap_or(domain_or_email)
        .trim()
        .trim_end_matches('.')
        .to_ascii_lowercase();

    DISPOSABLE_DOMAINS.contains(domain.as_str())
        || WILDCARD_SUFFIXES
            .iter()
            .any(|suffix| domain.ends_with(suffix))
}

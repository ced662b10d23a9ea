use phf::phf_set;

/// Local parts that conventionally name a function rather than a person.
static ROLE_ACCOUNTS: phf::Set<&'static str> = phf_set! {
    "abuse",
    "admin",
    "administrator",
    "billing",
    "contact",
    "customercare",
    "customerservice",
    "enquiries",
    "enquiry",
    "feedback",
    "hello",
    "help",
    "helpdesk",
    "hostmaster",
    "hr",
    "info",
    "inquiries",
    "it",
    "jobs",
    "legal",
    "mail",
    "mailer-daemon",
    "marketing",
    "media",
    "newsletter",
    "no-reply",
    "noreply",
    "notifications",
    "office",
    "orders",
    "postmaster",
    "press",
    "privacy",
    "root",
    "sales",
    "security",
    "service",
    "staff",
    "subscribe",
    "support",
    "team",
    "unsubscribe",
    "webadmin",
    "webmaster",
};

/// True when `local` is a known role account (case-insensitive).
pub fn is_role_account(local: &str) -> bool {
    ROLE_ACCOUNTS.contains(local.to_ascii_lowercase().as_str())
}

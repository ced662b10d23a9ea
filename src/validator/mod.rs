//! Syntactic e-mail validation and normalization.
//!
//! [`validate_email`] answers "is this well-formed"; [`normalize_email`] also
//! returns the decomposed parts (local, lowercased domain, IDNA-ASCII domain)
//! the rest of the pipeline works with.

mod domain;
mod local;
mod types;

pub use types::{EmailError, NormalizedEmail, ValidationMode, ValidationReport};

use domain::{check_domain, normalize_domain};
use local::check_local;

pub fn validate_email(email: &str, mode: ValidationMode) -> Result<ValidationReport, EmailError> {
    let input = email.trim();
    let mut reasons = Vec::new();

    if input.len() > 254 {
        reasons.push(format!("total length {} > 254", input.len()));
    }

    let Some((local, domain)) = split_address(input) else {
        reasons.push("must contain exactly one '@'".to_string());
        return Ok(ValidationReport { ok: false, reasons });
    };

    check_local(local, mode, &mut reasons);
    check_domain(domain, &mut reasons);

    let ok = reasons.is_empty();
    Ok(ValidationReport { ok, reasons })
}

/// Validate and return the normalized decomposition of the address. The parts
/// are filled in on a best-effort basis even when the address is invalid.
pub fn normalize_email(email: &str, mode: ValidationMode) -> Result<NormalizedEmail, EmailError> {
    let input = email.trim();
    let (local, domain) = split_address(input).unwrap_or(("", ""));

    let report = validate_email(email, mode)?;
    let (domain_lower, ascii_domain) = normalize_domain(domain);

    Ok(NormalizedEmail {
        original: email.to_string(),
        local: local.to_string(),
        domain: domain_lower,
        ascii_domain,
        mode,
        valid: report.ok,
        reasons: report.reasons,
    })
}

/// Split on '@'; `None` unless there is exactly one separator.
fn split_address(input: &str) -> Option<(&str, &str)> {
    let (local, domain) = input.split_once('@')?;
    if domain.contains('@') {
        return None;
    }
    Some((local, domain))
}

/// RFC 5321 atext specials accepted in an unquoted local part.
const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// Local-part checks: atext plus dots, no leading/trailing dot, no "..".
/// Invalidating reasons are pushed into `reasons`.
pub(crate) fn check_local(local: &str, mode: super::ValidationMode, reasons: &mut Vec<String>) {
    if local.is_empty() || local.len() > 64 {
        reasons.push(format!("local part length {} invalid (1..=64)", local.len()));
    }

    if matches!(mode, super::ValidationMode::Relaxed) && is_quoted(local) {
        return;
    }

    if local.starts_with('.') || local.ends_with('.') {
        reasons.push("local part cannot start or end with '.'".to_string());
    }
    if local.contains("..") {
        reasons.push("local part cannot contain consecutive dots".to_string());
    }
    if let Some(bad) = local
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '.' && !ATEXT_SPECIALS.contains(*c))
    {
        reasons.push(format!("local part has invalid character '{bad}'"));
    }
}

fn is_quoted(local: &str) -> bool {
    local.len() >= 2 && local.starts_with('"') && local.ends_with('"')
}

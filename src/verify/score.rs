//! Confidence scoring. Pure accumulation over the observed signals, clamped
//! to [0, 1] and rounded to two decimals.

const FORMAT_WEIGHT: f64 = 0.11;
const MX_WEIGHT: f64 = 0.21;
const ACCEPTED_WEIGHT: f64 = 0.5;
const NON_ROLE_BONUS: f64 = 0.2;
const NON_DISPOSABLE_BONUS: f64 = 0.21;

pub(crate) fn confidence(
    valid_format: bool,
    mx_found: bool,
    accepted: bool,
    role: bool,
    disposable: bool,
) -> f64 {
    let mut score = 0.0;
    if valid_format {
        score += FORMAT_WEIGHT;
    }
    if mx_found {
        score += MX_WEIGHT;
    }
    if accepted {
        score += ACCEPTED_WEIGHT;
        if !role {
            score += NON_ROLE_BONUS;
        }
        if !disposable {
            score += NON_DISPOSABLE_BONUS;
        }
    }
    round2(score.min(1.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

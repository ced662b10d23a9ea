#![forbid(unsafe_code)]
//! mailprobe — SMTP deliverability probing for e-mail addresses.
//!
//! The pipeline is strictly linear per address: format validation, MX
//! resolution and exchange selection, a minimal SMTP handshake against the
//! preferred exchange, and a scored verdict. No message is ever delivered.

pub mod validator;
pub use validator::{
    EmailError, NormalizedEmail, ValidationMode, ValidationReport, normalize_email, validate_email,
};

pub mod mx;
pub use mx::{Error as MxError, MxRecord, MxResolution, resolve_mx};

pub mod verify;
pub use verify::{
    Reason, VerificationResult, Verdict, VerifyError, VerifyOptions, is_disposable_address,
    is_role_account, verify_email, verify_email_with_options,
};

use thiserror::Error;

use crate::mx::Error as MxError;
use crate::validator::EmailError;

/// Configuration-time failures, raised before any network I/O. Everything
/// past configuration folds into a [`VerificationResult`](super::VerificationResult)
/// instead of erroring.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("missing email parameter")]
    MissingEmail,
    #[error("email normalization failed: {source}")]
    Email {
        #[source]
        source: EmailError,
    },
    #[error(transparent)]
    Mx(#[from] MxError),
}

//! SMTP handshake state machine.
//!
//! [`step`] is the pure transition table: given the current stage and a
//! complete server reply it decides what to send next, or how to conclude.
//! All I/O lives in the session driver; everything here is unit-testable
//! without a socket.

/// Protocol stage of a verification session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Connecting,
    AwaitGreeting,
    AwaitEhloAck,
    AwaitMailAck,
    AwaitRcptAck,
    Closing,
    Closed,
}

/// A complete server reply: every line received up to the final one, with the
/// status code parsed from the first line when it is numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SmtpReply {
    pub code: Option<u16>,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub(crate) fn has_code(&self, code: u16) -> bool {
        self.code == Some(code)
    }

    /// Substring match over the raw reply text, code included. Used for the
    /// configurable `ignore` acceptance check.
    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Transient busy codes that make a greeting-stage abort retry-eligible.
    pub(crate) fn is_transient_busy(&self) -> bool {
        matches!(self.code, Some(421 | 450 | 451))
    }

    pub(crate) fn summary(&self) -> String {
        self.lines.first().cloned().unwrap_or_default()
    }
}

/// What the driver must do after feeding a reply to [`step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Write `command` and advance to `next`.
    Send { command: String, next: Stage },
    /// The recipient probe answered; send `QUIT` and enter `Closing`.
    Conclude { accepted: bool },
    /// Abort: close the transport without further commands.
    Abort { retryable: bool },
    /// `Closing` saw its final reply; close the transport. Terminal.
    Hangup,
}

/// Everything the transition table needs to build commands.
pub(crate) struct HandshakeContext<'a> {
    pub fqdn: &'a str,
    pub sender: &'a str,
    pub recipient: &'a str,
    pub ignore: Option<&'a str>,
}

pub(crate) fn step(stage: Stage, reply: &SmtpReply, ctx: &HandshakeContext<'_>) -> Action {
    match stage {
        Stage::AwaitGreeting => {
            if reply.has_code(220) {
                Action::Send {
                    command: format!("EHLO {}", ctx.fqdn),
                    next: Stage::AwaitEhloAck,
                }
            } else {
                Action::Abort {
                    retryable: reply.is_transient_busy(),
                }
            }
        }
        Stage::AwaitEhloAck => {
            if reply.has_code(250) {
                Action::Send {
                    command: format!("MAIL FROM:<{}>", ctx.sender),
                    next: Stage::AwaitMailAck,
                }
            } else {
                Action::Abort { retryable: false }
            }
        }
        Stage::AwaitMailAck => {
            if reply.has_code(250) {
                Action::Send {
                    command: format!("RCPT TO:<{}>", ctx.recipient),
                    next: Stage::AwaitRcptAck,
                }
            } else {
                Action::Abort { retryable: false }
            }
        }
        Stage::AwaitRcptAck => {
            let accepted = reply.has_code(250)
                || ctx.ignore.is_some_and(|needle| reply.contains(needle));
            Action::Conclude { accepted }
        }
        // Connecting and Closed are not reply-driven; the driver never routes
        // a reply here.
        Stage::Closing | Stage::Connecting | Stage::Closed => Action::Hangup,
    }
}

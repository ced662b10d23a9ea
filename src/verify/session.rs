//! Session driver: owns the TCP transport and feeds complete replies through
//! the state machine until a terminal disposition is reached.
//!
//! A single deadline bounds the whole session. Every connect, read and write
//! is limited to the remaining budget; once it is spent the session is forced
//! to the timed-out disposition. The transport is owned by the driver and is
//! closed on every exit path when it goes out of scope.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::machine::{self, Action, HandshakeContext, SmtpReply, Stage};
use super::options::VerifyOptions;

/// Transcript entry, recorded per stage for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SmtpEvent {
    Sent { stage: Stage, command: String },
    Received { stage: Stage, reply: String },
    Failed { stage: Stage, message: String },
}

/// Terminal classification of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Disposition {
    Accepted,
    Rejected {
        stage: Stage,
        code: Option<u16>,
        retryable: bool,
    },
    TimedOut,
    Unavailable {
        message: String,
    },
}

#[derive(Debug)]
pub(crate) struct SessionOutcome {
    pub disposition: Disposition,
    pub events: Vec<SmtpEvent>,
}

impl SessionOutcome {
    fn new(disposition: Disposition, events: Vec<SmtpEvent>) -> Self {
        Self { disposition, events }
    }

    pub(crate) fn accepted(&self) -> bool {
        matches!(self.disposition, Disposition::Accepted)
    }
}

/// Run the greeting/EHLO/MAIL/RCPT/QUIT handshake against `exchange` and
/// classify the outcome. Exactly one disposition is produced per call.
pub(crate) fn probe_exchange(
    exchange: &str,
    options: &VerifyOptions,
    recipient: &str,
) -> SessionOutcome {
    let deadline = Instant::now() + options.session_timeout();
    let mut events = Vec::new();

    debug!(%exchange, port = options.port, "opening mail-transfer connection");

    let addrs = match resolve_socket_addrs(exchange, options.port) {
        Ok(addrs) if !addrs.is_empty() => addrs,
        Ok(_) => {
            let message = "no socket addresses resolved".to_string();
            events.push(SmtpEvent::Failed {
                stage: Stage::Connecting,
                message: message.clone(),
            });
            return SessionOutcome::new(Disposition::Unavailable { message }, events);
        }
        Err(err) => {
            let message = err.to_string();
            events.push(SmtpEvent::Failed {
                stage: Stage::Connecting,
                message: message.clone(),
            });
            return SessionOutcome::new(Disposition::Unavailable { message }, events);
        }
    };

    let mut transport = match Transport::connect(&addrs, deadline) {
        Ok(transport) => transport,
        Err(TransportFailure::TimedOut) => {
            warn!(%exchange, "connection attempt timed out");
            events.push(SmtpEvent::Failed {
                stage: Stage::Connecting,
                message: "connect timed out".to_string(),
            });
            return SessionOutcome::new(Disposition::TimedOut, events);
        }
        Err(TransportFailure::Closed) | Err(TransportFailure::Io(_)) => {
            let message = "connection attempt failed".to_string();
            warn!(%exchange, %message);
            events.push(SmtpEvent::Failed {
                stage: Stage::Connecting,
                message: message.clone(),
            });
            return SessionOutcome::new(Disposition::Unavailable { message }, events);
        }
    };

    let ctx = HandshakeContext {
        fqdn: &options.fqdn,
        sender: &options.sender,
        recipient,
        ignore: options.ignore.as_deref(),
    };

    let mut stage = Stage::AwaitGreeting;
    let mut accepted = false;
    let mut rcpt_code: Option<u16> = None;

    let disposition = loop {
        let reply = match transport.read_reply(deadline) {
            Ok(reply) => reply,
            Err(TransportFailure::TimedOut) => {
                events.push(SmtpEvent::Failed {
                    stage,
                    message: "session timed out".to_string(),
                });
                break Disposition::TimedOut;
            }
            Err(TransportFailure::Closed) => {
                // Server hung up; derive the outcome from what was seen.
                break close_disposition(accepted, stage, rcpt_code);
            }
            Err(TransportFailure::Io(err)) => {
                events.push(SmtpEvent::Failed {
                    stage,
                    message: err.to_string(),
                });
                break Disposition::Unavailable {
                    message: err.to_string(),
                };
            }
        };
        debug!(?stage, reply = %reply.summary(), "server");
        events.push(SmtpEvent::Received {
            stage,
            reply: reply.summary(),
        });

        match machine::step(stage, &reply, &ctx) {
            Action::Send { command, next } => {
                debug!(?stage, %command, "client");
                events.push(SmtpEvent::Sent {
                    stage,
                    command: command.clone(),
                });
                if let Some(failed) = send_or_fail(&mut transport, &command, deadline, stage, &mut events) {
                    break failed;
                }
                stage = next;
            }
            Action::Conclude { accepted: ok } => {
                accepted = ok;
                rcpt_code = reply.code;
                debug!(?stage, accepted = ok, "recipient probe answered");
                events.push(SmtpEvent::Sent {
                    stage,
                    command: "QUIT".to_string(),
                });
                if let Some(failed) = send_or_fail(&mut transport, "QUIT", deadline, stage, &mut events) {
                    break failed;
                }
                stage = Stage::Closing;
            }
            Action::Abort { retryable } => {
                break Disposition::Rejected {
                    stage,
                    code: reply.code,
                    retryable,
                };
            }
            Action::Hangup => {
                break close_disposition(accepted, stage, rcpt_code);
            }
        }
    };

    // transport drops here, closing the socket on every path; the machine is
    // Closed regardless of which exit was taken
    let outcome = SessionOutcome::new(disposition, events);
    debug!(
        stage = ?Stage::Closed,
        disposition = ?outcome.disposition,
        transcript = outcome.events.len(),
        "session finished"
    );
    outcome
}

fn send_or_fail(
    transport: &mut Transport,
    command: &str,
    deadline: Instant,
    stage: Stage,
    events: &mut Vec<SmtpEvent>,
) -> Option<Disposition> {
    match transport.send_command(command, deadline) {
        Ok(()) => None,
        Err(TransportFailure::TimedOut) => {
            events.push(SmtpEvent::Failed {
                stage,
                message: "session timed out".to_string(),
            });
            Some(Disposition::TimedOut)
        }
        Err(TransportFailure::Closed) | Err(TransportFailure::Io(_)) => {
            let message = format!("write failed at {stage:?}");
            events.push(SmtpEvent::Failed {
                stage,
                message: message.clone(),
            });
            Some(Disposition::Unavailable { message })
        }
    }
}

/// Close without prior acceptance, timeout or error: the exchange received
/// the probe but never accepted it.
fn close_disposition(accepted: bool, stage: Stage, rcpt_code: Option<u16>) -> Disposition {
    if accepted {
        Disposition::Accepted
    } else {
        Disposition::Rejected {
            stage,
            code: rcpt_code,
            retryable: false,
        }
    }
}

fn resolve_socket_addrs(exchange: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    format!("{exchange}:{port}")
        .to_socket_addrs()
        .map(|iter| iter.collect())
}

enum TransportFailure {
    TimedOut,
    Closed,
    Io(io::Error),
}

struct Transport {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Transport {
    fn connect(addrs: &[SocketAddr], deadline: Instant) -> Result<Self, TransportFailure> {
        let mut last_err = None;
        for addr in addrs {
            let Some(budget) = remaining(deadline) else {
                return Err(TransportFailure::TimedOut);
            };
            match TcpStream::connect_timeout(addr, budget) {
                Ok(stream) => {
                    let reader = BufReader::new(stream.try_clone().map_err(TransportFailure::Io)?);
                    return Ok(Self { stream, reader });
                }
                Err(err) if is_timeout(&err) => return Err(TransportFailure::TimedOut),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.map(TransportFailure::Io).unwrap_or_else(|| {
            TransportFailure::Io(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no socket address available",
            ))
        }))
    }

    /// Read one complete reply: lines are accumulated until the final line of
    /// a (possibly multiline) response; the status code comes from the first
    /// line when it parses.
    fn read_reply(&mut self, deadline: Instant) -> Result<SmtpReply, TransportFailure> {
        let mut lines = Vec::new();
        let mut code: Option<u16> = None;
        loop {
            let budget = remaining(deadline).ok_or(TransportFailure::TimedOut)?;
            self.stream
                .set_read_timeout(Some(budget))
                .map_err(TransportFailure::Io)?;

            let mut raw = String::new();
            let read = self.reader.read_line(&mut raw).map_err(|err| {
                if is_timeout(&err) {
                    TransportFailure::TimedOut
                } else {
                    TransportFailure::Io(err)
                }
            })?;
            if read == 0 {
                if lines.is_empty() {
                    return Err(TransportFailure::Closed);
                }
                // mid-reply close: classify what was received so far
                break;
            }
            while raw.ends_with('\n') || raw.ends_with('\r') {
                raw.pop();
            }

            let line_code = parse_code(&raw);
            if code.is_none() {
                code = line_code;
            }
            let continued = line_code.is_some() && raw.as_bytes().get(3).copied() == Some(b'-');
            lines.push(raw);
            if !continued {
                break;
            }
        }
        Ok(SmtpReply { code, lines })
    }

    fn send_command(&mut self, command: &str, deadline: Instant) -> Result<(), TransportFailure> {
        let budget = remaining(deadline).ok_or(TransportFailure::TimedOut)?;
        self.stream
            .set_write_timeout(Some(budget))
            .map_err(TransportFailure::Io)?;

        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream.write_all(&line).map_err(classify_write)?;
        self.stream.flush().map_err(classify_write)
    }
}

fn classify_write(err: io::Error) -> TransportFailure {
    if is_timeout(&err) {
        TransportFailure::TimedOut
    } else {
        TransportFailure::Io(err)
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Budget left before `deadline`; `None` once it is spent.
fn remaining(deadline: Instant) -> Option<Duration> {
    let left = deadline.checked_duration_since(Instant::now())?;
    if left.is_zero() { None } else { Some(left) }
}

fn parse_code(line: &str) -> Option<u16> {
    line.get(..3)?.parse::<u16>().ok()
}

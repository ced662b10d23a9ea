use clap::{Parser, Subcommand};
use mailprobe::VerifyOptions;

#[derive(Parser)]
#[command(name = "mailprobe-cli")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file (JSON/NDJSON depending on --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson
    #[arg(long, default_value = "human")]
    pub format: String,

    /// TCP port for the mail-transfer connection
    #[arg(long, default_value_t = 25)]
    pub port: u16,

    /// address used in MAIL FROM
    #[arg(long, default_value = "name@example.org")]
    pub sender: String,

    /// per-session timeout in ms (0 = built-in 5000 ms fallback)
    #[arg(long, default_value_t = 0)]
    pub timeout: u64,

    /// client hostname used in EHLO
    #[arg(long, default_value = "mail.example.org")]
    pub fqdn: String,

    /// substring in the RCPT reply that counts as acceptance
    #[arg(long)]
    pub ignore: Option<String>,

    /// DNS server override ("ip" or "ip:port", repeatable)
    #[arg(long = "dns")]
    pub dns: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// probe deliverability of a single address
    Verify { email: String },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            port: self.port,
            sender: self.sender.clone(),
            timeout_ms: self.timeout,
            fqdn: self.fqdn.clone(),
            ignore: self.ignore.clone(),
            dns: if self.dns.is_empty() {
                None
            } else {
                Some(self.dns.clone())
            },
        }
    }
}

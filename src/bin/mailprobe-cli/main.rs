mod args;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use mailprobe::{Verdict, verify_email_with_options};

use args::{Cli, Commands};
use output::Row;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.verify_options();
    let mut rows: Vec<Row> = Vec::new();

    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let email = line.context("read stdin")?;
            if email.trim().is_empty() {
                continue;
            }
            let result = verify_email_with_options(&email, &options)
                .with_context(|| format!("verify '{email}'"))?;
            rows.push(Row { email, result });
        }
    } else if let Some(Commands::Verify { email }) = cli.cmd {
        let result = verify_email_with_options(&email, &options)
            .with_context(|| format!("verify '{email}'"))?;
        rows.push(Row { email, result });
    } else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    }

    output::render(&cli.format, cli.out.as_deref(), &rows)?;

    // exit codes: 0 all deliverable, 2 otherwise, 1 fatal
    let any_undeliverable = rows.iter().any(|row| row.result.result != Verdict::Deliverable);
    if any_undeliverable {
        std::process::exit(2);
    }
    Ok(())
}

use anyhow::Result;
use mailprobe::VerificationResult;

pub struct Row {
    pub email: String,
    pub result: VerificationResult,
}

#[cfg(feature = "with-serde")]
#[derive(serde::Serialize)]
struct JsonRow<'a> {
    email: &'a str,
    #[serde(flatten)]
    result: &'a VerificationResult,
}

pub fn render(format: &str, out: Option<&str>, rows: &[Row]) -> Result<()> {
    match format {
        "human" => {
            let mut buf = String::new();
            for row in rows {
                buf.push_str(&format!(
                    "[{}] {} :: reason={} score={:.2}{}{}\n",
                    row.result.result.as_str().to_uppercase(),
                    row.email,
                    row.result.reason,
                    row.result.score,
                    if row.result.role { " role" } else { "" },
                    if row.result.disposable { " disposable" } else { "" },
                ));
            }
            if let Some(path) = out {
                write_all_atomically(path, buf.as_bytes())?;
            } else {
                print!("{buf}");
            }
        }
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                let rows: Vec<JsonRow<'_>> = rows
                    .iter()
                    .map(|row| JsonRow {
                        email: &row.email,
                        result: &row.result,
                    })
                    .collect();
                let s = serde_json::to_string_pretty(&rows)?;
                if let Some(path) = out {
                    write_all_atomically(path, s.as_bytes())?;
                } else {
                    println!("{s}");
                }
            }
            #[cfg(not(feature = "with-serde"))]
            {
                eprintln!("format=json requires the 'with-serde' feature");
                std::process::exit(1);
            }
        }
        "ndjson" => {
            #[cfg(feature = "with-serde")]
            {
                let mut buf = Vec::new();
                for row in rows {
                    let line = serde_json::to_string(&JsonRow {
                        email: &row.email,
                        result: &row.result,
                    })?;
                    buf.extend_from_slice(line.as_bytes());
                    buf.push(b'\n');
                }
                if let Some(path) = out {
                    write_all_atomically(path, &buf)?;
                } else {
                    print!("{}", String::from_utf8_lossy(&buf));
                }
            }
            #[cfg(not(feature = "with-serde"))]
            {
                eprintln!("format=ndjson requires the 'with-serde' feature");
                std::process::exit(1);
            }
        }
        other => anyhow::bail!("unknown --format '{other}', use: human|json|ndjson"),
    }
    Ok(())
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

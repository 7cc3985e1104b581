use anyhow::{anyhow, Result};
use pulse_dashboard::{render_dashboard, DashboardClient, DEFAULT_API_BASE};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  pulse-dashboard [--api <base-url>] [--out <file.html>]");
    eprintln!();
    eprintln!("Defaults: --api {DEFAULT_API_BASE}, HTML written to stdout");
}

struct Args {
    api: String,
    out: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut parsed = Args {
        api: DEFAULT_API_BASE.to_string(),
        out: None,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--api" => {
                parsed.api = iter
                    .next()
                    .ok_or_else(|| anyhow!("--api requires a value"))?
                    .clone();
            }
            "--out" => {
                parsed.out = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--out requires a value"))?
                        .clone(),
                );
            }
            "--help" | "-h" => return Ok(None),
            other => return Err(anyhow!("Unknown argument '{}'", other)),
        }
    }
    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout may carry the page itself.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("pulse=info".parse()?))
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            print_usage();
            return Err(e);
        }
    };

    let client = DashboardClient::new(&args.api);
    let data = client.fetch_all().await;
    let updated_at = chrono::Local::now().format("%-I:%M:%S %p").to_string();
    let html = render_dashboard(&data, &updated_at);

    match args.out {
        Some(path) => {
            std::fs::write(&path, html)
                .map_err(|e| anyhow!("Failed to write dashboard to '{}': {}", path, e))?;
            tracing::info!(path = %path, "Dashboard written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

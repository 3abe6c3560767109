// ABOUTME: CLI binary for the closet product extractor.
// ABOUTME: Extracts product data from URLs or saved HTML files and prints it as JSON.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use closet_extract::{Client, ExtractedProduct, FetchMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "closet-extract")]
#[command(about = "Extract clothing product data from shopping pages")]
struct Args {
    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print single-line JSON instead of pretty JSON
    #[arg(long = "compact")]
    compact: bool,

    /// HTML file to extract from (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Page URL for the HTML file, used to resolve relative links (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Derive a brand from the host name when the page names none
    #[arg(long = "brand-from-domain")]
    brand_from_domain: bool,

    /// Seconds allowed per URL
    #[arg(long = "timeout-secs", default_value_t = 10)]
    timeout_secs: u64,

    /// Delegate extraction to a remote service (POST <endpoint>/extract)
    #[arg(long = "proxy")]
    proxy: Option<String>,

    /// URLs to extract (fetch mode)
    #[arg()]
    urls: Vec<String>,
}

fn format_output(results: &[ExtractedProduct], compact: bool) -> anyhow::Result<String> {
    let out = match (results, compact) {
        ([single], false) => serde_json::to_string_pretty(single)?,
        ([single], true) => serde_json::to_string(single)?,
        (many, false) => serde_json::to_string_pretty(many)?,
        (many, true) => serde_json::to_string(many)?,
    };
    Ok(out)
}

async fn run(args: &Args) -> anyhow::Result<bool> {
    let fetch_mode = match &args.proxy {
        Some(endpoint) => FetchMode::Proxy {
            endpoint: endpoint.clone(),
        },
        None => FetchMode::Direct,
    };
    let client = Client::builder()
        .allow_private_networks(args.allow_private_networks)
        .brand_from_domain(args.brand_from_domain)
        .timeout(Duration::from_secs(args.timeout_secs))
        .fetch_mode(fetch_mode)
        .build();

    let start = Instant::now();
    let mut results: Vec<ExtractedProduct> = Vec::new();
    let mut had_error = false;

    if let (Some(html_path), Some(url)) = (&args.html, &args.url) {
        let html = fs::read_to_string(html_path)
            .with_context(|| format!("reading {}", html_path.display()))?;
        results.push(client.extract_html(&html, url).await?);
    } else {
        for url in &args.urls {
            match client.extract_url(url).await {
                Ok(product) => results.push(product),
                Err(e) => {
                    tracing::warn!(url = url.as_str(), code = %e.code, "extraction failed");
                    eprintln!("error extracting {}: {}", url, e);
                    had_error = true;
                }
            }
        }
    }

    let elapsed = start.elapsed();

    if !results.is_empty() {
        let output = format_output(&results, args.compact)?;
        match &args.output {
            Some(path) => fs::write(path, &output)
                .with_context(|| format!("writing {}", path.display()))?,
            None => println!("{}", output),
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    Ok(!had_error)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

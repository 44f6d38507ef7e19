// ABOUTME: CLI binary for the product metadata extraction engine.
// ABOUTME: Extracts previews from URLs (concurrently) or from a saved HTML file and prints them as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use futures::stream::{self, StreamExt};
use vista_prodmeta::{Client, DomainPolicy, Preview};

#[derive(Parser, Debug)]
#[command(name = "prodmeta")]
#[command(about = "Extract product title, image and price from e-commerce URLs")]
struct Args {
    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to extract from (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Page URL for the HTML file (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = 15)]
    timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long = "user-agent")]
    user_agent: Option<String>,

    /// Only allow these domains (repeatable; a JSON array or one domain per line)
    #[arg(long = "allow")]
    allow: Vec<String>,

    /// Refuse these domains (repeatable; a JSON array or one domain per line)
    #[arg(long = "block")]
    block: Vec<String>,

    /// Maximum number of pages fetched at once
    #[arg(long = "concurrency", default_value_t = 4)]
    concurrency: usize,

    /// Log extraction decisions to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// URLs to extract (fetch mode)
    #[arg()]
    urls: Vec<String>,
}

fn domain_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| DomainPolicy::parse_list(value))
        .collect()
}

fn format_output(previews: &[Preview]) -> serde_json::Result<String> {
    if previews.len() == 1 {
        serde_json::to_string_pretty(&previews[0])
    } else {
        serde_json::to_string_pretty(previews)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

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

    let mut builder = Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .domain_policy(DomainPolicy::new(
            domain_list(&args.allow),
            domain_list(&args.block),
        ));
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let mut had_error = false;
    let previews: Vec<Preview> = match (&args.html, &args.url) {
        (Some(html_path), Some(url)) => match fs::read_to_string(html_path) {
            Ok(html) => {
                let outcome = client.extract_html(&html, url);
                vec![Preview::from_outcome(url, &outcome)]
            }
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                return ExitCode::from(1);
            }
        },
        _ => {
            let client = &client;
            stream::iter(args.urls.iter())
                .map(|url| async move {
                    let outcome = client.extract(url).await;
                    Preview::from_outcome(url, &outcome)
                })
                .buffered(args.concurrency.max(1))
                .collect()
                .await
        }
    };

    for preview in &previews {
        if let Some(err) = &preview.error {
            eprintln!("error extracting {}: {}", preview.url, err);
            had_error = true;
        }
    }

    match format_output(&previews) {
        Ok(output) => {
            if let Some(output_path) = &args.output {
                if let Err(e) = fs::write(output_path, &output) {
                    eprintln!("error writing to {:?}: {}", output_path, e);
                    had_error = true;
                }
            } else {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("error encoding output: {}", e);
            had_error = true;
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

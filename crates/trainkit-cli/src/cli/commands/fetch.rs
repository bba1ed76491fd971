//! `trainkit fetch [URL]...` – grab pages and write them out as UTF-8.

use anyhow::{bail, Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use trainkit_core::config::FetchSettings;
use trainkit_core::fetch::{
    read_urls_interactive, run_batch, BatchOptions, BatchSummary, CurlFetcher, FetchOutcome,
};

/// Resolved `fetch` arguments (language and output dir already defaulted).
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub urls: Vec<String>,
    pub keyboard: bool,
    pub language: String,
    pub redirect_only: bool,
    pub cookies: Vec<(String, String)>,
    pub output_dir: PathBuf,
}

async fn prompt_for_urls() -> Result<Vec<String>> {
    println!("Enter the first url (or just enter to quit):");
    io::stdout().flush()?;
    tokio::task::spawn_blocking(|| read_urls_interactive(io::stdin().lock()))
        .await
        .context("stdin task join")?
        .context("reading urls from keyboard")
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "Wrote {} page(s), {} redirect(s) captured, {} not redirected, {} failed ({} round(s))",
        summary.written.len(),
        summary.redirects.len(),
        summary.not_redirected,
        summary.failures.len(),
        summary.rounds
    );
}

pub async fn run_fetch(args: FetchArgs, settings: &FetchSettings) -> Result<()> {
    let mut urls = args.urls;
    if args.keyboard {
        urls.extend(prompt_for_urls().await?);
    }
    if urls.is_empty() {
        if args.keyboard {
            return Ok(());
        }
        bail!("no URLs given (pass URLs or use --keyboard)");
    }

    if !args.output_dir.is_dir() {
        bail!("output directory {} does not exist", args.output_dir.display());
    }

    let options = BatchOptions {
        language: args.language,
        redirect_only: args.redirect_only,
        cookies: args.cookies,
        output_dir: args.output_dir,
    };
    let settings = settings.clone();

    let summary = tokio::task::spawn_blocking(move || {
        let fetcher = CurlFetcher::new(settings.clone());
        run_batch(&fetcher, urls, &options, &settings, |url, result| match result {
            Ok(FetchOutcome::Written { path, charset }) => {
                println!("{} -> {} ({})", url, path.display(), charset)
            }
            Ok(FetchOutcome::Redirect(location)) => println!("{} redirects to {}", url, location),
            Ok(FetchOutcome::NotRedirected(code)) => {
                println!("{}: HTTP {}, not a redirect; nothing written", url, code)
            }
            Err(e) => println!("{}: {}", url, e),
        })
    })
    .await
    .context("fetch task join")?;

    print_summary(&summary);
    Ok(())
}

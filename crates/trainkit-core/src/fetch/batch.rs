//! Sequential batch driver: fetch each URL in turn, pause between fetches,
//! then fetch any captured redirect targets as a new round.

use chrono::Local;
use std::collections::HashSet;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use super::{output_filename, FetchError, FetchOutcome, FetchRequest, PageFetcher};
use crate::config::FetchSettings;

/// Per-invocation options from the command line.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Language/country tag embedded in output filenames (e.g. `en_US`).
    pub language: String,
    /// First round captures redirects instead of writing pages.
    pub redirect_only: bool,
    pub cookies: Vec<(String, String)>,
    /// Directory the output files are created in.
    pub output_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub written: Vec<PathBuf>,
    /// Redirect targets captured (each fetched in the next round).
    pub redirects: Vec<String>,
    /// Redirect-only fetches whose response was not a redirect.
    pub not_redirected: usize,
    /// `(url, reason)` for every failed fetch.
    pub failures: Vec<(String, String)>,
    pub rounds: u32,
}

/// Trims, drops blanks and removes duplicates, keeping first-seen order.
fn normalize_urls(urls: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// Reads newline-terminated URLs until a blank line or EOF.
pub fn read_urls_interactive<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        urls.push(line.to_string());
    }
    Ok(normalize_urls(urls))
}

/// Fetches `urls` one at a time, sleeping `settings.delay_secs` between
/// fetches (never before the first). Every failure is reported through
/// `on_result`, recorded and skipped. Redirect targets captured in a round are
/// fetched in normal mode in the next round; rounds continue until one yields
/// no redirect.
pub fn run_batch<F, C>(
    fetcher: &F,
    urls: Vec<String>,
    options: &BatchOptions,
    settings: &FetchSettings,
    mut on_result: C,
) -> BatchSummary
where
    F: PageFetcher + ?Sized,
    C: FnMut(&str, &Result<FetchOutcome, FetchError>),
{
    let delay = Duration::from_secs_f64(settings.delay_secs.max(0.0));
    let mut summary = BatchSummary::default();
    let mut pending = normalize_urls(urls);
    let mut redirect_only = options.redirect_only;
    let mut fetched_any = false;

    while !pending.is_empty() {
        summary.rounds += 1;
        tracing::info!(
            "round {}: {} url(s), redirect_only={}",
            summary.rounds,
            pending.len(),
            redirect_only
        );

        let mut next_round = Vec::new();
        for url in &pending {
            let result = output_filename(url, &options.language, Local::now()).and_then(|name| {
                if fetched_any && !delay.is_zero() {
                    thread::sleep(delay);
                }
                fetched_any = true;
                let request = FetchRequest {
                    url: url.clone(),
                    output: options.output_dir.join(name),
                    cookies: options.cookies.clone(),
                    redirect_only,
                };
                fetcher.fetch(&request)
            });

            on_result(url, &result);
            match result {
                Ok(FetchOutcome::Written { path, .. }) => summary.written.push(path),
                Ok(FetchOutcome::Redirect(location)) => {
                    summary.redirects.push(location.clone());
                    next_round.push(location);
                }
                Ok(FetchOutcome::NotRedirected(code)) => {
                    tracing::debug!("{}: HTTP {} is not a redirect, nothing written", url, code);
                    summary.not_redirected += 1;
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    summary.failures.push((url.clone(), e.to_string()));
                }
            }
        }

        pending = normalize_urls(next_round);
        redirect_only = false;
    }

    summary
}

//! CLI for the trainkit corpus tools.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trainkit_core::config::{self, TrainkitConfig};

use commands::{run_fetch, run_report, FetchArgs};

/// Top-level CLI: page fetcher and training coverage report.
#[derive(Debug, Parser)]
#[command(name = "trainkit")]
#[command(about = "Text-classification corpus tools: fetch pages as UTF-8, report training coverage", long_about = None)]
pub struct Cli {
    /// Load this config file instead of the XDG default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Grab web pages and write them out as UTF-8 files.
    Fetch {
        /// Page URLs to fetch, in order.
        urls: Vec<String>,

        /// Read URLs from the keyboard (one per line, blank line to finish).
        #[arg(short = 'k', long)]
        keyboard: bool,

        /// Language/country tag embedded in output filenames (e.g. he_IL).
        #[arg(short = 'l', long, value_name = "TAG")]
        language: Option<String>,

        /// Only capture redirects; fetch their targets in a second pass.
        #[arg(long)]
        redirect_only: bool,

        /// Cookie sent with every request. Repeatable.
        #[arg(long = "cookie", value_name = "NAME=VALUE", value_parser = parse_cookie)]
        cookies: Vec<(String, String)>,

        /// Directory to write pages into (default: current directory).
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Print an HTML training statistics report for a corpus directory.
    Report {
        /// Top-level training data directory (`<root>/<category>/<lang>_*`).
        #[arg(value_name = "TOP_LEVEL_DIRECTORY")]
        root: PathBuf,
    },
}

/// Parses `NAME=VALUE`; the value may itself contain `=`.
fn parse_cookie(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("cookie name is empty in {:?}", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn load_config(path: Option<&PathBuf>) -> Result<TrainkitConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                urls,
                keyboard,
                language,
                redirect_only,
                cookies,
                output_dir,
            } => {
                let output_dir = match output_dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                let args = FetchArgs {
                    urls,
                    keyboard,
                    language: language.unwrap_or_else(|| cfg.fetch.default_language.clone()),
                    redirect_only,
                    cookies,
                    output_dir,
                };
                run_fetch(args, &cfg.fetch).await?;
            }
            CliCommand::Report { root } => run_report(&root, &cfg.report).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

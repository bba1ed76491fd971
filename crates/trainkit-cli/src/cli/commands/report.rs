//! `trainkit report <dir>` – HTML training statistics on stdout.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use trainkit_core::config::ReportSettings;
use trainkit_core::report::{build_report, render_html};

pub async fn run_report(root: &Path, settings: &ReportSettings) -> Result<()> {
    let root = root.to_path_buf();
    let settings = settings.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let report = build_report(&root, &settings)
            .with_context(|| format!("scanning {}", root.display()))?;
        let stdout = io::stdout();
        let mut out = io::BufWriter::new(stdout.lock());
        render_html(&report, &settings, &mut out).context("writing report")?;
        out.flush().context("writing report")?;
        Ok(())
    })
    .await
    .context("report task join")?
}

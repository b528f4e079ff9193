//! Render command - resolve the partial includes of a page

use crate::cli::args::{OutputFormat, RenderArgs};
use crate::config::Config;
use crate::error::{PartialsError, PartialsResult};
use crate::fetch::{create_fetcher, FragmentFetcher, FragmentSource};
use crate::loader::{LoadSummary, MountOutcome, MountPoint, PartialLoader};
use crate::page::Page;
use crate::storage::{MemoryStorage, SessionStore, Storage};
use console::style;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Execute the render command
pub async fn execute(args: RenderArgs, config: &Config) -> PartialsResult<()> {
    if !args.page.exists() {
        return Err(PartialsError::PathNotFound(args.page.clone()));
    }
    let source = fs::read_to_string(&args.page)
        .await
        .map_err(|e| PartialsError::io(format!("reading page {}", args.page.display()), e))?;

    let page = Page::parse(source, &config.loader.marker_attribute)?;
    debug!("Found {} mount points in {}", page.len(), args.page.display());

    let fragment_source = FragmentSource::resolve(args.root.clone(), args.base_url.clone(), config)?;
    let fetcher: Arc<dyn FragmentFetcher> = Arc::from(create_fetcher(&fragment_source, config));

    let storage: Arc<dyn Storage> = if args.no_cache || !config.storage.enabled {
        debug!("Session cache disabled for this render");
        Arc::new(MemoryStorage::new())
    } else {
        let session = args.session.as_deref().unwrap_or(&config.storage.session);
        Arc::new(SessionStore::open(session)?)
    };

    let loader = PartialLoader::new(fetcher.clone(), storage)
        .with_cache_prefix(config.loader.cache_prefix.clone());

    let mut mounts = page.mount_points();
    let summary = loader.load_all(&mut mounts).await;
    let html = page.render(&mounts)?;

    match &args.output {
        Some(path) => fs::write(path, &html)
            .await
            .map_err(|e| PartialsError::io(format!("writing page {}", path.display()), e))?,
        None => print!("{}", html),
    }

    if let Some(format) = args.report {
        print_report(&mounts, format)?;
    }
    print_summary(&summary, &fetcher.describe());

    Ok(())
}

#[derive(Serialize)]
struct ReportRow<'a> {
    fragment: &'a str,
    outcome: MountOutcome,
    cache_applied: bool,
    bytes: usize,
}

fn report_rows(mounts: &[MountPoint]) -> Vec<ReportRow<'_>> {
    mounts
        .iter()
        .map(|m| ReportRow {
            fragment: &m.fragment_id,
            outcome: m.outcome(),
            cache_applied: m.cache_applied,
            bytes: m.content.len(),
        })
        .collect()
}

fn print_report(mounts: &[MountPoint], format: OutputFormat) -> PartialsResult<()> {
    let rows = report_rows(mounts);

    match format {
        OutputFormat::Json => eprintln!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => {
            for row in &rows {
                eprintln!("{}\t{}", row.fragment, outcome_label(row.outcome));
            }
        }
        OutputFormat::Table => {
            eprintln!(
                "{:<40} {:<10} {:<8} {:>8}",
                style("FRAGMENT").bold(),
                style("OUTCOME").bold(),
                style("CACHED").bold(),
                style("BYTES").bold()
            );
            eprintln!("{}", "-".repeat(69));
            for row in &rows {
                let outcome = match row.outcome {
                    MountOutcome::Network => style("network").green(),
                    MountOutcome::Cache => style("cache").yellow(),
                    MountOutcome::Error => style("error").red(),
                    MountOutcome::Skipped => style("skipped").dim(),
                };
                eprintln!(
                    "{:<40} {:<10} {:<8} {:>8}",
                    row.fragment,
                    outcome,
                    if row.cache_applied { "yes" } else { "no" },
                    row.bytes
                );
            }
        }
    }

    Ok(())
}

fn outcome_label(outcome: MountOutcome) -> &'static str {
    match outcome {
        MountOutcome::Network => "network",
        MountOutcome::Cache => "cache",
        MountOutcome::Error => "error",
        MountOutcome::Skipped => "skipped",
    }
}

fn print_summary(summary: &LoadSummary, source: &str) {
    let mark = if summary.failed == 0 {
        style("✓").green()
    } else {
        style("!").yellow()
    };
    eprintln!(
        "{} {} mount points from {}: {} network, {} cache, {} failed",
        mark,
        summary.total(),
        style(source).cyan(),
        summary.network,
        summary.cache,
        summary.failed
    );
}

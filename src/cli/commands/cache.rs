//! Cache command - inspect or clear the session cache

use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::PartialsResult;
use crate::storage::{CachedFragment, SessionStore};
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> PartialsResult<()> {
    let session = args.session.as_deref().unwrap_or(&config.storage.session);
    let store = SessionStore::open(session)?;

    match args.action {
        CacheAction::List { format } => list_entries(&store, format).await,
        CacheAction::Clear => clear_entries(&store, session).await,
        CacheAction::Path => {
            println!("{}", store.path().display());
            Ok(())
        }
    }
}

async fn list_entries(store: &SessionStore, format: OutputFormat) -> PartialsResult<()> {
    let entries = store.entries().await?;

    if entries.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No cached fragments."),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => {
            for (key, _) in &entries {
                println!("{}", key);
            }
        }
    }

    Ok(())
}

fn print_table(entries: &[(String, CachedFragment)]) {
    println!(
        "{:<48} {:<14} {:>8} {:<17}",
        style("KEY").bold(),
        style("DIGEST").bold(),
        style("BYTES").bold(),
        style("STORED").bold()
    );
    println!("{}", "-".repeat(90));

    for (key, entry) in entries {
        println!(
            "{:<48} {:<14} {:>8} {:<17}",
            key,
            style(entry.digest()).dim(),
            entry.html.len(),
            entry.stored_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    println!("Total: {} fragment(s)", entries.len());
}

fn print_json(entries: &[(String, CachedFragment)]) -> PartialsResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson<'a> {
        key: &'a str,
        digest: String,
        bytes: usize,
        stored_at: String,
    }

    let json: Vec<EntryJson<'_>> = entries
        .iter()
        .map(|(key, entry)| EntryJson {
            key,
            digest: entry.digest(),
            bytes: entry.html.len(),
            stored_at: entry.stored_at.to_rfc3339(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn clear_entries(store: &SessionStore, session: &str) -> PartialsResult<()> {
    let removed = store.clear().await?;
    println!(
        "{} Removed {} cached fragment(s) from session {}",
        style("✓").green(),
        removed,
        style(session).cyan()
    );
    Ok(())
}

//! List command handler.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use super::{entry_path, open_store, truncate_str};
use crate::cli::ListArgs;
use crate::cli::config::Config;
use crate::cli::output::{Output, OutputFormat, PostListing};
use crate::store::ContentStore;

pub fn handle_list(args: &ListArgs, config: &Config, db: &Path) -> Result<()> {
    let store = open_store(db)?;
    let folder = config.export_options(None)?.folder;

    let listings = collect_listings(&store, &folder)?;
    write_listings(&mut io::stdout().lock(), &listings, args.format)
}

/// Selects and fetches every post an export would include, in export order.
pub(crate) fn collect_listings(store: &dyn ContentStore, folder: &str) -> Result<Vec<PostListing>> {
    let ids = store
        .select_published_ids()
        .context("failed to select published posts")?;

    ids.into_iter()
        .map(|id| -> Result<PostListing> {
            let record = store
                .fetch_record(id)
                .with_context(|| format!("failed to fetch post {}", id))?;
            Ok(PostListing {
                id: id.get(),
                slug: record.slug().to_string(),
                title: record.title().to_string(),
                path: entry_path(folder, record.slug()),
            })
        })
        .collect()
}

pub(crate) fn write_listings(
    out: &mut dyn Write,
    listings: &[PostListing],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if listings.is_empty() {
                writeln!(out, "No published posts found.")?;
                return Ok(());
            }

            writeln!(out, "{:>6}  {:<30}  {:<40}", "ID", "Slug", "Title")?;
            writeln!(
                out,
                "{:>6}  {:<30}  {:<40}",
                "------",
                "------------------------------",
                "----------------------------------------"
            )?;
            for post in listings {
                writeln!(
                    out,
                    "{:>6}  {:<30}  {:<40}",
                    post.id,
                    truncate_str(&post.slug, 30),
                    truncate_str(&post.title, 40)
                )?;
            }
            writeln!(out)?;
            writeln!(out, "{} post(s)", listings.len())?;
        }
        OutputFormat::Json => {
            let output = Output::new(listings);
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputFormat::Paths => {
            for post in listings {
                writeln!(out, "{}", post.path)?;
            }
        }
    }
    Ok(())
}

//! Handler for the `export` command.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::ExportArgs;
use crate::cli::config::Config;
use crate::cli::output::{ExportSummary, Output, OutputFormat};
use crate::export::{
    ArchiveSink, AutoParagraphFilter, BodyFilter, ExportReport, Exporter, FileSink,
    HttpResponseSink, PassthroughFilter, WriterSink,
};

use super::open_store;

/// Handle the `export` command.
///
/// The archive goes to a file by default, to stdout with `-o -`, or to
/// stdout wrapped in an HTTP response with `--http`. The summary goes to
/// stderr whenever stdout carries the archive.
pub fn handle_export(args: &ExportArgs, config: &Config, db: &Path) -> Result<()> {
    let store = open_store(db)?;
    let options = config.export_options(args.folder.as_deref())?;
    let filter: &dyn BodyFilter = if config.autop(args.no_autop) {
        &AutoParagraphFilter
    } else {
        &PassthroughFilter
    };

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&options.download_name));
    let mut exporter = Exporter::new(&store, filter, options);

    let (report, destination) = if args.http {
        let mut sink = HttpResponseSink::new(io::stdout().lock());
        (run(&mut exporter, &mut sink)?, "http".to_string())
    } else if args.streams_to_stdout() {
        let mut sink = WriterSink::new(io::stdout().lock());
        (run(&mut exporter, &mut sink)?, "stdout".to_string())
    } else {
        let mut sink = FileSink::new(&target);
        (
            run(&mut exporter, &mut sink)?,
            target.display().to_string(),
        )
    };

    let summary = ExportSummary {
        records: report.records,
        bytes: report.bytes,
        sha256: report.hash.to_string(),
        destination,
        entries: report.entries,
    };

    if args.streams_to_stdout() {
        write_summary(&mut io::stderr().lock(), &summary, args.format)
    } else {
        write_summary(&mut io::stdout().lock(), &summary, args.format)
    }
}

fn run(exporter: &mut Exporter<'_>, sink: &mut dyn ArchiveSink) -> Result<ExportReport> {
    exporter.run(sink).context("export failed")
}

/// Writes the export summary in the requested format.
pub(crate) fn write_summary(
    out: &mut dyn Write,
    summary: &ExportSummary,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            writeln!(
                out,
                "Exported {} post(s) to {}",
                summary.records, summary.destination
            )?;
            writeln!(out, "  size:   {} bytes", summary.bytes)?;
            writeln!(out, "  sha256: {}", summary.sha256)?;
        }
        OutputFormat::Json => {
            let output = Output::new(summary);
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputFormat::Paths => {
            for entry in &summary.entries {
                writeln!(out, "{}", entry)?;
            }
        }
    }
    Ok(())
}

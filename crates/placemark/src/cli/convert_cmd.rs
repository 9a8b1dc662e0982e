//! `placemark <input> <output>`: convert a CSV file or a ZIP of CSVs.

use crate::cli::output::{self, Styled};
use crate::cli::progress;
use crate::config::Settings;
use crate::document::{write_output, OutputFormat};
use crate::input::{read_csv_file, CsvArchive};
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::layers::Layer;
use crate::place::{Failure, RawRow};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Resolved command-line request.
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub input: PathBuf,
    /// Output file for CSV input, output directory for ZIP input.
    pub output: PathBuf,
    pub format: OutputFormat,
    pub options: PipelineOptions,
}

/// Outcome for one converted CSV.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: String,
    pub output: PathBuf,
    pub layers: Vec<PathBuf>,
    pub placed: usize,
    pub failed: usize,
    /// Places per layer. Empty when layering is off.
    pub by_layer: BTreeMap<Layer, usize>,
    pub failures: Vec<Failure>,
}

/// Run the conversion.
pub async fn run(args: &ConvertArgs, settings: &Settings) -> Result<()> {
    let s = Styled::new();
    let start = Instant::now();

    let mut pipeline =
        Pipeline::from_settings(settings, args.options).context("failed to set up HTTP client")?;

    if !output::is_quiet() && !output::is_json() {
        output::print_header(&s);
    }

    let zip_input = is_zip(&args.input);
    let reports = if zip_input {
        convert_zip(&mut pipeline, &args.input, &args.output, args.format).await?
    } else {
        vec![convert_csv(&mut pipeline, &args.input, &args.output, args.format).await?]
    };

    let placed: usize = reports.iter().map(|r| r.placed).sum();
    let failed: usize = reports.iter().map(|r| r.failed).sum();
    info!(
        "run finished: {} file(s), {placed} places, {failed} failed in {:.1}s",
        reports.len(),
        start.elapsed().as_secs_f64()
    );

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "files": reports,
            "placed": placed,
            "failed": failed,
            "options": args.options,
            "geocode": pipeline.geocode_stats(),
            "elapsed_ms": start.elapsed().as_millis() as u64,
        }));
        return Ok(());
    }

    if !output::is_quiet() {
        for report in &reports {
            let sym = if report.failed > 0 { s.warn_sym() } else { s.ok_sym() };
            eprintln!(
                "  {sym} Created {} with {}",
                report.output.display(),
                output::format_counts(&s, report.placed, report.failed)
            );
        }
        if zip_input {
            eprintln!();
            eprintln!(
                "  {} {} file(s), {}",
                s.bold("Total:"),
                reports.len(),
                output::format_counts(&s, placed, failed)
            );
        }
        if let Some(stats) = pipeline.geocode_stats() {
            eprintln!(
                "  {}",
                s.dim(&format!(
                    "geocoding: {} requests, {} cache hits, {} failures",
                    stats.requests, stats.cache_hits, stats.failures
                ))
            );
        }
    }

    Ok(())
}

/// Convert one CSV file to `output`.
pub async fn convert_csv(
    pipeline: &mut Pipeline,
    input: &Path,
    output: &Path,
    format: OutputFormat,
) -> Result<FileReport> {
    let rows = read_csv_file(input).with_context(|| format!("failed to read {}", input.display()))?;
    let title = file_stem(input);

    let bar = progress::create_bar(rows.len(), &title);
    let report = convert_rows(pipeline, &rows, &title, output, format, |done| {
        bar.set_position(done as u64)
    })
    .await?;
    progress::finish(&bar);

    Ok(FileReport {
        source: input.display().to_string(),
        ..report
    })
}

/// Convert every CSV in the archive to `<output_dir>/<stem>.<ext>`, in archive order.
pub async fn convert_zip(
    pipeline: &mut Pipeline,
    input: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<FileReport>> {
    let mut archive =
        CsvArchive::open(input).with_context(|| format!("failed to read {}", input.display()))?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    if archive.is_empty() && !output::is_quiet() && !output::is_json() {
        let s = Styled::new();
        eprintln!("  {} no CSV files in {}", s.warn_sym(), input.display());
    }

    let bar = progress::create_bar(archive.len(), &file_stem(input));
    let mut reports = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .entry(i)
            .with_context(|| format!("failed to read CSV #{} in {}", i + 1, input.display()))?;
        let out = output_dir.join(format!("{}.{}", entry.stem, format.extension()));
        let report = convert_rows(pipeline, &entry.rows, &entry.stem, &out, format, |_| {}).await?;
        reports.push(FileReport {
            source: entry.name.clone(),
            ..report
        });
        bar.set_position((i + 1) as u64);
    }
    progress::finish(&bar);

    Ok(reports)
}

async fn convert_rows<F>(
    pipeline: &mut Pipeline,
    rows: &[RawRow],
    title: &str,
    output: &Path,
    format: OutputFormat,
    on_row: F,
) -> Result<FileReport>
where
    F: FnMut(usize),
{
    let document = pipeline
        .convert_with_progress(rows, Some(title), on_row)
        .await
        .with_context(|| format!("failed to render {title}"))?;

    let written = write_output(&document, output, format)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        "created {} with {} places ({} failed)",
        output.display(),
        document.placed,
        document.failed()
    );

    Ok(FileReport {
        source: title.to_string(),
        output: written.aggregate,
        layers: written.layers,
        placed: document.placed,
        failed: document.failed(),
        by_layer: document
            .layers
            .iter()
            .map(|l| (l.layer, l.place_count))
            .collect(),
        failures: document.failures,
    })
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "places".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::{FetchError, HttpResponse, PageFetcher};
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Arc;
    use zip::write::SimpleFileOptions;

    struct OfflineFetcher;

    #[async_trait]
    impl PageFetcher for OfflineFetcher {
        async fn fetch(&self, _url: &str) -> Result<HttpResponse, FetchError> {
            Err(FetchError::Connect("offline".into()))
        }
    }

    fn offline_pipeline() -> Pipeline {
        Pipeline::new(Arc::new(OfflineFetcher), None, PipelineOptions::default())
    }

    const CSV: &str = "Title,Note,URL\n\
        Cafe X,,\"https://maps.google.com/@40.7128,-74.0060,15z\"\n\
        Nowhere,lost,\n";

    #[test]
    fn test_is_zip() {
        assert!(is_zip(Path::new("takeout.ZIP")));
        assert!(!is_zip(Path::new("saved.csv")));
        assert!(!is_zip(Path::new("zip")));
    }

    #[tokio::test]
    async fn test_convert_csv_writes_aggregate_and_layers() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("saved.csv");
        std::fs::write(&input, CSV).unwrap();
        let out = dir.path().join("out").join("saved.kml");

        let mut pipeline = offline_pipeline();
        let report = convert_csv(&mut pipeline, &input, &out, OutputFormat::Kml)
            .await
            .unwrap();

        assert_eq!(report.placed, 1);
        assert_eq!(report.failed, 1);
        assert!(out.exists());
        let kml = std::fs::read_to_string(&out).unwrap();
        assert!(kml.contains("<name>saved</name>"));
        assert!(kml.contains("no URL"));
        assert_eq!(report.layers.len(), 2);
    }

    #[tokio::test]
    async fn test_report_serializes_layers_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("saved.csv");
        std::fs::write(&input, CSV).unwrap();

        let mut pipeline = offline_pipeline();
        let report = convert_csv(&mut pipeline, &input, &dir.path().join("saved.kmz"), OutputFormat::Kmz)
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["by_layer"]["Do"], 1);
        assert_eq!(json["failures"][0]["subject_name"], "Nowhere");
        assert_eq!(json["failures"][0]["reason"], "no URL");
    }

    #[tokio::test]
    async fn test_convert_zip_handles_each_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("takeout.zip");
        {
            let file = std::fs::File::create(&input).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let opts = SimpleFileOptions::default();
            zip.start_file("Saved/Want to go.csv", opts).unwrap();
            zip.write_all(CSV.as_bytes()).unwrap();
            zip.start_file("Saved/readme.txt", opts).unwrap();
            zip.write_all(b"not a csv").unwrap();
            zip.start_file("Saved/Favourites.CSV", opts).unwrap();
            zip.write_all(CSV.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        let out_dir = dir.path().join("kml");

        let mut pipeline = offline_pipeline();
        let reports = convert_zip(&mut pipeline, &input, &out_dir, OutputFormat::Kmz)
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].output, out_dir.join("Want to go.kmz"));
        assert_eq!(reports[1].output, out_dir.join("Favourites.kmz"));
        assert!(reports.iter().all(|r| r.output.exists()));
        assert_eq!(reports[1].source, "Saved/Favourites.CSV");
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = offline_pipeline();
        let result = convert_csv(
            &mut pipeline,
            &dir.path().join("absent.csv"),
            &dir.path().join("out.kml"),
            OutputFormat::Kml,
        )
        .await;
        assert!(result.is_err());
    }
}

//! The `run` subcommand: one browser session driven through the keyword ×
//! region matrix, followed by aggregation and artifact writing.
//!
//! Per-task failures are recorded and skipped rather than propagated so one
//! bad search does not abort the rest of the matrix.

mod output;
mod report;

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use shelfwatch_core::{build_run_matrix, AppConfig, Platform, ProductRecord, SearchTask, TasksFile};
use shelfwatch_scraper::{
    assemble_records, AdapterRegistry, ParsedListing, PlatformAdapter, ScrapeError,
};
use shelfwatch_sov::{aggregate, RankWeighting};

use report::{RunReport, RunTotals, TaskReport};

/// Flags that shape a run beyond what [`AppConfig`] carries.
pub(crate) struct RunOptions {
    pub platform: Platform,
    pub weighting: RankWeighting,
    pub dump_raw: bool,
}

/// Resolve the keyword and region lists for the run: CLI flags win, the YAML
/// manifest fills whichever side the flags leave unset.
///
/// # Errors
///
/// Returns an error when the manifest is needed but unreadable, or when the
/// resolved lists fail validation (empty, blank, or duplicate entries).
pub(crate) fn resolve_tasks(
    config: &AppConfig,
    keywords: Option<Vec<String>>,
    regions: Option<Vec<String>>,
) -> anyhow::Result<TasksFile> {
    let tasks = match (keywords, regions) {
        (Some(keywords), Some(regions)) => TasksFile { keywords, regions },
        (keywords, regions) => {
            let manifest = shelfwatch_core::load_tasks(&config.tasks_path)?;
            TasksFile {
                keywords: keywords.unwrap_or(manifest.keywords),
                regions: regions.unwrap_or(manifest.regions),
            }
        }
    };
    tasks.validate()?;
    Ok(tasks)
}

/// Execute the full run: adapter bring-up, the task matrix, aggregation, and
/// artifact writing.
///
/// # Errors
///
/// Returns an error when the browser cannot be brought up at all, when the
/// storefront is unreachable before any task ran, when artifacts cannot be
/// written, or when every task in the matrix failed (reported after the
/// report file is written).
pub(crate) async fn run_matrix(
    config: &AppConfig,
    options: &RunOptions,
    tasks: &TasksFile,
) -> anyhow::Result<()> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let matrix = build_run_matrix(&tasks.keywords, &tasks.regions);
    tracing::info!(
        %run_id,
        platform = %options.platform,
        tasks = matrix.len(),
        weighting = %options.weighting,
        "starting run"
    );

    let registry = AdapterRegistry::new();
    let mut adapter = registry.create(options.platform, config.clone());

    let driven = drive_matrix(adapter.as_mut(), config, options, &matrix).await;
    if let Err(e) = adapter.close().await {
        tracing::warn!(error = %e, "adapter close failed");
    }
    let MatrixOutcome {
        records,
        task_reports,
    } = driven?;

    let scores = aggregate(&records, options.weighting);
    let finished_at = Utc::now();

    let brands: BTreeSet<&str> = scores.iter().map(|s| s.brand.as_str()).collect();
    let totals = RunTotals::tally(&task_reports, records.len(), brands.len());
    let report = RunReport {
        run_id,
        platform: options.platform,
        weighting: options.weighting.to_string(),
        started_at,
        finished_at,
        tasks: task_reports,
        totals,
    };

    let stamp = started_at.format("%Y%m%d_%H%M%S").to_string();
    let products_path =
        output::write_products_csv(&config.output_dir, options.platform, &stamp, &records)?;
    let sov_path = output::write_sov_csv(&config.output_dir, options.platform, &stamp, &scores)?;
    let report_path =
        output::write_report_json(&config.output_dir, options.platform, &stamp, &report)?;

    tracing::info!(
        products = %products_path.display(),
        sov = %sov_path.display(),
        report = %report_path.display(),
        "artifacts written"
    );
    println!(
        "run {run_id}: {} tasks, {} completed, {} failed, {} records, {} brands",
        report.totals.tasks,
        report.totals.completed,
        report.totals.failed,
        report.totals.records,
        report.totals.brands
    );

    if report.totals.tasks > 0 && report.totals.completed == 0 {
        anyhow::bail!(
            "all {} tasks failed; see {}",
            report.totals.failed,
            report_path.display()
        );
    }
    Ok(())
}

struct MatrixOutcome {
    records: Vec<ProductRecord>,
    task_reports: Vec<TaskReport>,
}

/// Walk the matrix sequentially on one adapter.
///
/// `initialize` and the first navigation are fatal when they fail, because
/// nothing can run without them. After that every failure is caught at the
/// task boundary: a `set_location` failure fails all remaining tasks of that
/// region, a fatal browser error fails the current task and everything after
/// it, and anything else fails just its own task. The matrix itself always
/// runs to the end so the report enumerates every cell.
async fn drive_matrix(
    adapter: &mut dyn PlatformAdapter,
    config: &AppConfig,
    options: &RunOptions,
    matrix: &[SearchTask],
) -> anyhow::Result<MatrixOutcome> {
    adapter.initialize().await?;
    adapter.navigate_to_site().await?;

    let raw_dir = if options.dump_raw {
        Some(output::ensure_raw_dir(&config.output_dir)?)
    } else {
        None
    };

    let task_timeout = Duration::from_secs(config.task_timeout_secs);
    let mut records = Vec::new();
    let mut task_reports = Vec::new();
    let mut active_region: Option<&str> = None;
    let mut dead_region: Option<(&str, String)> = None;
    let mut abort: Option<String> = None;

    for (index, task) in matrix.iter().enumerate() {
        if let Some(reason) = &abort {
            task_reports.push(TaskReport::failed(task, format!("skipped: {reason}")));
            continue;
        }
        if let Some((region, reason)) = &dead_region {
            if *region == task.region {
                task_reports.push(TaskReport::failed(task, reason.clone()));
                continue;
            }
        }

        if active_region != Some(task.region.as_str()) {
            if let Err(e) = adapter.set_location(&task.region).await {
                tracing::warn!(
                    region = %task.region,
                    error = %e,
                    "region failed, skipping its tasks"
                );
                let reason = e.to_string();
                task_reports.push(TaskReport::failed(task, reason.clone()));
                dead_region = Some((task.region.as_str(), reason));
                active_region = None;
                continue;
            }
            active_region = Some(task.region.as_str());
        }

        match tokio::time::timeout(task_timeout, run_task(adapter, task, raw_dir.as_deref())).await
        {
            Ok(Ok(task_records)) => {
                tracing::info!(task = %task, records = task_records.len(), "task completed");
                task_reports.push(TaskReport::completed(task, task_records.len()));
                records.extend(task_records);
            }
            Ok(Err(e)) => {
                tracing::warn!(task = %task, error = %e, "task failed");
                task_reports.push(TaskReport::failed(task, e.to_string()));
                if e.is_fatal() {
                    tracing::error!(task = %task, "browser session unusable, failing remaining tasks");
                    abort = Some(e.to_string());
                }
            }
            Err(_) => {
                let e = ScrapeError::SearchTimeout {
                    keyword: task.keyword.clone(),
                    waited_secs: config.task_timeout_secs,
                };
                tracing::warn!(task = %task, error = %e, "task timed out");
                task_reports.push(TaskReport::failed(task, e.to_string()));
            }
        }

        if config.task_delay_ms > 0 && index + 1 < matrix.len() {
            let jitter = rand::rng().random_range(0..=config.task_delay_ms / 2);
            tokio::time::sleep(Duration::from_millis(config.task_delay_ms + jitter)).await;
        }
    }

    Ok(MatrixOutcome {
        records,
        task_reports,
    })
}

/// One matrix cell: search, optionally dump the raw captures, map payloads,
/// and assemble ranked records.
async fn run_task(
    adapter: &mut dyn PlatformAdapter,
    task: &SearchTask,
    raw_dir: Option<&Path>,
) -> Result<Vec<ProductRecord>, ScrapeError> {
    let captures = adapter.search_for_keyword(&task.keyword).await?;

    if let Some(dir) = raw_dir {
        for (seq, capture) in captures.iter().enumerate() {
            if let Err(e) = output::write_raw_capture(dir, capture, seq) {
                tracing::warn!(task = %task, seq, error = %e, "raw capture dump failed");
            }
        }
    }

    let listings: Vec<ParsedListing> = captures
        .iter()
        .flat_map(|capture| adapter.extract_data(capture))
        .collect();
    Ok(assemble_records(adapter.platform(), task, listings))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;

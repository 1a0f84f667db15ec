//! File writers for run artifacts: products CSV, share-of-voice CSV, the
//! JSON run report, and optional raw capture dumps.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use shelfwatch_core::{Platform, ProductRecord};
use shelfwatch_scraper::CapturedResponse;
use shelfwatch_sov::VisibilityScore;

use super::report::RunReport;

pub(crate) fn write_products_csv(
    dir: &Path,
    platform: Platform,
    stamp: &str,
    records: &[ProductRecord],
) -> anyhow::Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{platform}_products_{stamp}.csv"));
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(path)
}

pub(crate) fn write_sov_csv(
    dir: &Path,
    platform: Platform,
    stamp: &str,
    scores: &[VisibilityScore],
) -> anyhow::Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{platform}_sov_{stamp}.csv"));
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    for score in scores {
        writer.serialize(score)?;
    }
    writer.flush()?;
    Ok(path)
}

pub(crate) fn write_report_json(
    dir: &Path,
    platform: Platform,
    stamp: &str,
    report: &RunReport,
) -> anyhow::Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{platform}_report_{stamp}.json"));
    let file =
        fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&file, report)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Create the output directory (and parents) if it does not exist yet.
fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(())
}

/// Create `<dir>/raw` for capture dumps and return its path.
pub(crate) fn ensure_raw_dir(dir: &Path) -> anyhow::Result<PathBuf> {
    let raw = dir.join("raw");
    fs::create_dir_all(&raw).with_context(|| format!("creating {}", raw.display()))?;
    Ok(raw)
}

/// Write one captured body as `{keyword}_{region}_{seq}.json` for offline
/// debugging and mapper replay.
pub(crate) fn write_raw_capture(
    raw_dir: &Path,
    capture: &CapturedResponse,
    seq: usize,
) -> anyhow::Result<PathBuf> {
    let name = format!(
        "{}_{}_{seq}.json",
        filename_component(&capture.task.keyword),
        filename_component(&capture.task.region),
    );
    let path = raw_dir.join(name);
    fs::write(&path, &capture.body).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Keep filenames shell-friendly: lowercase alphanumerics, `-` for the rest.
fn filename_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use shelfwatch_core::SearchTask;

    use super::super::report::{RunTotals, TaskReport};
    use super::*;

    fn record(rank: u32) -> ProductRecord {
        ProductRecord {
            platform: Platform::Zepto,
            keyword: "milk".to_owned(),
            region: "560001".to_owned(),
            rank,
            product_id: format!("p-{rank}"),
            name: format!("product {rank}"),
            brand: "Acme".to_owned(),
            category: None,
            price: Some(Decimal::new(2450, 2)),
            mrp: None,
            rating: None,
            rating_count: None,
            in_stock: true,
            is_sponsored: false,
            pack_size: None,
            image_url: None,
            product_url: None,
            extracted_at: Utc::now(),
        }
    }

    #[test]
    fn products_csv_has_headers_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_products_csv(
            dir.path(),
            Platform::Zepto,
            "20250101_000000",
            &[record(1), record(2)],
        )
        .unwrap();

        assert!(path.ends_with("zepto_products_20250101_000000.csv"));
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3, "header plus two rows");
        assert!(lines[0].starts_with("platform,keyword,region,rank,product_id"));
        assert!(lines[1].contains("p-1"));
        assert!(lines[2].contains("24.50"), "price is written in rupees");
    }

    #[test]
    fn empty_record_set_still_produces_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path =
            write_products_csv(dir.path(), Platform::Blinkit, "20250101_000000", &[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn sov_csv_carries_score_rows() {
        let dir = tempfile::tempdir().unwrap();
        let score = VisibilityScore {
            keyword: "milk".to_owned(),
            region: "560001".to_owned(),
            brand: "Acme".to_owned(),
            weighted_score: Decimal::new(15, 1),
            raw_count: 2,
            count_share_pct: Decimal::new(10_000, 2),
            weighted_share_pct: Decimal::new(10_000, 2),
            avg_rank: Decimal::new(150, 2),
            sponsored_count: 0,
        };
        let path =
            write_sov_csv(dir.path(), Platform::Zepto, "20250101_000000", &[score]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("keyword,region,brand,weighted_score"));
        assert!(content.contains("Acme"));
        assert!(content.contains("1.5"));
    }

    #[test]
    fn report_json_round_trips_totals() {
        let dir = tempfile::tempdir().unwrap();
        let task = SearchTask::new("milk", "560001");
        let reports = vec![
            TaskReport::completed(&task, 5),
            TaskReport::failed(&task, "timed out"),
        ];
        let report = RunReport {
            run_id: Uuid::new_v4(),
            platform: Platform::Zepto,
            weighting: "reciprocal".to_owned(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            totals: RunTotals::tally(&reports, 5, 2),
            tasks: reports,
        };

        let path =
            write_report_json(dir.path(), Platform::Zepto, "20250101_000000", &report).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["platform"], "zepto");
        assert_eq!(value["totals"]["tasks"], 2);
        assert_eq!(value["totals"]["completed"], 1);
        assert_eq!(value["tasks"][1]["error"], "timed out");
    }

    #[test]
    fn raw_capture_filename_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let raw = ensure_raw_dir(dir.path()).unwrap();
        let capture = CapturedResponse {
            matched_url: "https://api.example.com/search".to_owned(),
            body: r#"{"items":[]}"#.to_owned(),
            task: SearchTask::new("Hair Care", "560001"),
            captured_at: Utc::now(),
        };

        let path = write_raw_capture(&raw, &capture, 0).unwrap();
        assert!(path.ends_with("raw/hair-care_560001_0.json"));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"items":[]}"#);
    }

    #[test]
    fn filename_component_flattens_awkward_input() {
        assert_eq!(filename_component("hair care"), "hair-care");
        assert_eq!(filename_component("Soft Drinks!"), "soft-drinks");
        assert_eq!(filename_component("a   b"), "a-b");
    }
}

//! Stage tables as CSV and the run report as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analysis::summary::Summary;
use crate::analysis::Analysis;
use crate::error::{PipelineError, Result};
use crate::issues::DataIssue;
use crate::model::{PriceDifferenceReport, ProductGroup, ProductRecord};

pub const PREPROCESSED_FILE: &str = "preprocessed_data.csv";
pub const ANALYZED_FILE: &str = "analyzed_ingredients.csv";
pub const GROUPED_FILE: &str = "grouped_products.csv";
pub const DIFFERENCES_FILE: &str = "price_differences.csv";
pub const REPORT_FILE: &str = "report.json";

#[derive(Serialize)]
struct PreprocessedRow<'a> {
    #[serde(rename = "Brand")]
    brand: &'a str,
    #[serde(rename = "Product Name")]
    product_name: &'a str,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Active Ingredient")]
    active_ingredient: &'a str,
    #[serde(rename = "Inactive Ingredients")]
    inactive_ingredients: &'a str,
    #[serde(rename = "Gender Classification")]
    gender: &'a str,
}

impl<'a> From<&'a ProductRecord> for PreprocessedRow<'a> {
    fn from(r: &'a ProductRecord) -> Self {
        PreprocessedRow {
            brand: r.brand(),
            product_name: r.product_name(),
            price: r.price(),
            active_ingredient: r.active_ingredient(),
            inactive_ingredients: r.inactive_ingredients(),
            gender: r.gender().as_str(),
        }
    }
}

#[derive(Serialize)]
struct AnalyzedRow<'a> {
    #[serde(rename = "Brand")]
    brand: &'a str,
    #[serde(rename = "Product Name")]
    product_name: &'a str,
    #[serde(rename = "Active Ingredient")]
    active_ingredient: &'a str,
    #[serde(rename = "Functionality of Active Ingredient")]
    functionality: &'a str,
    #[serde(rename = "Gender Classification")]
    gender: &'a str,
    #[serde(rename = "Price")]
    price: f64,
}

impl<'a> From<&'a ProductRecord> for AnalyzedRow<'a> {
    fn from(r: &'a ProductRecord) -> Self {
        AnalyzedRow {
            brand: r.brand(),
            product_name: r.product_name(),
            active_ingredient: r.active_ingredient(),
            functionality: r.functionality().unwrap_or(""),
            gender: r.gender().as_str(),
            price: r.price(),
        }
    }
}

#[derive(Serialize)]
struct GroupRow<'a> {
    #[serde(rename = "Group ID")]
    group_id: u32,
    #[serde(rename = "Brand")]
    brand: &'a str,
    #[serde(rename = "Female Product")]
    women_product: &'a str,
    #[serde(rename = "Male Product")]
    men_product: &'a str,
    #[serde(rename = "Functionality of Active Ingredient in Female Products")]
    women_functionality: &'a str,
    #[serde(rename = "Functionality of Active Ingredient in Male Products")]
    men_functionality: &'a str,
    #[serde(rename = "Female Price")]
    women_price: f64,
    #[serde(rename = "Male Price")]
    men_price: f64,
    #[serde(rename = "Similarity Score")]
    similarity: f64,
}

impl<'a> From<&'a ProductGroup> for GroupRow<'a> {
    fn from(g: &'a ProductGroup) -> Self {
        GroupRow {
            group_id: g.group_id(),
            brand: g.brand(),
            women_product: g.women().product_name(),
            men_product: g.men().product_name(),
            women_functionality: g.women().functionality().unwrap_or(""),
            men_functionality: g.men().functionality().unwrap_or(""),
            women_price: g.women().price(),
            men_price: g.men().price(),
            similarity: g.similarity_percent(),
        }
    }
}

#[derive(Serialize)]
struct DifferenceRow<'a> {
    #[serde(rename = "Brand")]
    brand: &'a str,
    #[serde(rename = "Female Product")]
    women_product: &'a str,
    #[serde(rename = "Male Product")]
    men_product: &'a str,
    #[serde(rename = "Active Ingredient in Female Products")]
    women_functionality: &'a str,
    #[serde(rename = "Active Ingredient in Male Products")]
    men_functionality: &'a str,
    #[serde(rename = "Price of Female Products")]
    women_price: f64,
    #[serde(rename = "Price of Male Products")]
    men_price: f64,
    #[serde(rename = "Percent Price Difference")]
    difference: String,
}

impl<'a> From<&'a PriceDifferenceReport> for DifferenceRow<'a> {
    fn from(r: &'a PriceDifferenceReport) -> Self {
        DifferenceRow {
            brand: &r.brand,
            women_product: &r.women_product,
            men_product: &r.men_product,
            women_functionality: r.women_functionality.as_deref().unwrap_or(""),
            men_functionality: r.men_functionality.as_deref().unwrap_or(""),
            women_price: r.women_price,
            men_price: r.men_price,
            difference: r.delta.to_string(),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    run_id: &'a str,
    generated_at: DateTime<Utc>,
    summary: &'a Summary,
    differences: &'a [PriceDifferenceReport],
    issues: &'a [DataIssue],
}

pub fn new_run_id(now: DateTime<Utc>) -> String {
    format!("run-{}", now.format("%Y%m%dT%H%M%SZ"))
}

fn write_table<'a, T, R>(path: &Path, items: &'a [T]) -> Result<()>
where
    R: Serialize + From<&'a T>,
{
    let file = fs::File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    for item in items {
        writer.serialize(R::from(item))?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    Ok(())
}

/// Write every stage table plus `report.json` into `dir`, creating it if
/// needed. `issues` should hold ingestion and pipeline issues together.
/// Returns the paths written.
pub fn write_all(
    dir: &Path,
    analysis: &Analysis,
    summary: &Summary,
    issues: &[DataIssue],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;

    let preprocessed = dir.join(PREPROCESSED_FILE);
    write_table::<_, PreprocessedRow>(&preprocessed, &analysis.normalized)?;
    let analyzed = dir.join(ANALYZED_FILE);
    write_table::<_, AnalyzedRow>(&analyzed, &analysis.classified)?;
    let grouped = dir.join(GROUPED_FILE);
    write_table::<_, GroupRow>(&grouped, &analysis.groups)?;
    let differences = dir.join(DIFFERENCES_FILE);
    write_table::<_, DifferenceRow>(&differences, &analysis.differences)?;

    let now = Utc::now();
    let run_id = new_run_id(now);
    let report = Report {
        run_id: &run_id,
        generated_at: now,
        summary,
        differences: &analysis.differences,
        issues,
    };
    let report_path = dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&report_path, json).map_err(|e| PipelineError::io(&report_path, e))?;

    info!("Wrote {} to {}", run_id, dir.display());
    Ok(vec![preprocessed, analyzed, grouped, differences, report_path])
}

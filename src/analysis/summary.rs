use itertools::Itertools;
use serde::Serialize;

use crate::model::PriceDifferenceReport;

/// Descriptive counts over a set of price-difference reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub pairs: usize,
    pub women_pay_more: usize,
    pub men_pay_more: usize,
    pub same_price: usize,
    pub indeterminate: usize,
    pub mean_percent: Option<f64>,
    pub median_percent: Option<f64>,
}

pub fn summarize(reports: &[PriceDifferenceReport]) -> Summary {
    let percents: Vec<f64> = reports
        .iter()
        .filter_map(|r| r.delta.percent())
        .sorted_by(|a, b| a.total_cmp(b))
        .collect();

    let mean_percent = if percents.is_empty() {
        None
    } else {
        Some(percents.iter().sum::<f64>() / percents.len() as f64)
    };

    Summary {
        pairs: reports.len(),
        women_pay_more: percents.iter().filter(|p| **p > 0.0).count(),
        men_pay_more: percents.iter().filter(|p| **p < 0.0).count(),
        same_price: percents.iter().filter(|p| **p == 0.0).count(),
        indeterminate: reports.len() - percents.len(),
        mean_percent,
        median_percent: median(&percents),
    }
}

// expects sorted input
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Gender, ProductRecord, RawProduct};

static MEN_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bmen\b").unwrap());
static WOMEN_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bwomen\b").unwrap());

/// How a product name is read when the gender label is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameFallback {
    /// Plain substring test, "men" before "women". Since "women" contains
    /// "men", any name mentioning women resolves to Men.
    #[default]
    MenFirst,
    /// Whole-word test, "women" before "men".
    WomenFirst,
}

/// Normalize with the default name fallback.
pub fn normalize_gender(raw_label: Option<&str>, product_name: &str) -> Gender {
    normalize_with(raw_label, product_name, NameFallback::default())
}

pub fn normalize_with(raw_label: Option<&str>, product_name: &str, fallback: NameFallback) -> Gender {
    match raw_label.filter(|l| !l.trim().is_empty()) {
        Some(label) => from_label(label),
        None => from_name(product_name, fallback),
    }
}

fn from_label(label: &str) -> Gender {
    match label.trim().to_lowercase().as_str() {
        "male" | "m" | "men" => Gender::Men,
        "female" | "f" | "women" => Gender::Women,
        "unisex" => Gender::Unisex,
        _ => Gender::Other(label.to_string()),
    }
}

fn from_name(product_name: &str, fallback: NameFallback) -> Gender {
    let name = product_name.to_lowercase();
    match fallback {
        NameFallback::MenFirst => {
            if name.contains("men") {
                Gender::Men
            } else if name.contains("women") {
                Gender::Women
            } else {
                Gender::Unisex
            }
        }
        NameFallback::WomenFirst => {
            if WOMEN_WORD_RE.is_match(&name) {
                Gender::Women
            } else if MEN_WORD_RE.is_match(&name) {
                Gender::Men
            } else {
                Gender::Unisex
            }
        }
    }
}

/// Normalization stage: raw products become records with a gender category.
pub fn normalize_records(
    products: &[RawProduct],
    fallback: NameFallback,
    progress: &mut dyn FnMut(usize, usize),
) -> Vec<ProductRecord> {
    let total = products.len();
    products
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let gender = normalize_with(raw.gender_label.as_deref(), &raw.product_name, fallback);
            progress(i + 1, total);
            ProductRecord::from_raw(raw, gender)
        })
        .collect()
}

//! Recognized input columns and their accepted header spellings.

use std::collections::HashMap;
use std::sync::LazyLock;

use csv::StringRecord;
use regex::Regex;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// `Price (€)`, `Price (USD)`, ...
static CURRENCY_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^price\s*\(.+\)$").unwrap());

/// Columns removed during preprocessing.
pub const DROPPED_COLUMNS: &[&str] = &["URL", "Price Per Unit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Brand,
    ProductName,
    Price,
    ActiveIngredient,
    InactiveIngredients,
    GenderClassification,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Brand,
        Field::ProductName,
        Field::Price,
        Field::ActiveIngredient,
        Field::InactiveIngredients,
        Field::GenderClassification,
    ];

    pub fn canonical(self) -> &'static str {
        self.synonyms()[0]
    }

    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::Brand => &["Brand"],
            Field::ProductName => &["Product Name"],
            Field::Price => &["Price"],
            Field::ActiveIngredient => &["Active Ingredient", "Active Ingredients"],
            Field::InactiveIngredients => &["Inactive Ingredients", "Inactive Ingredient"],
            Field::GenderClassification => &["Gender Classification", "Gender"],
        }
    }

    /// Without a gender column every label counts as missing and the
    /// product name decides.
    pub fn is_required(self) -> bool {
        !matches!(self, Field::GenderClassification)
    }
}

/// Match a header against the schema, ignoring case and outer whitespace.
pub fn recognize(header: &str) -> Option<Field> {
    let header = header.trim();
    if DROPPED_COLUMNS.iter().any(|d| d.eq_ignore_ascii_case(header)) {
        return None;
    }
    Field::ALL
        .into_iter()
        .find(|f| f.synonyms().iter().any(|s| s.eq_ignore_ascii_case(header)))
        .or_else(|| CURRENCY_PRICE_RE.is_match(header).then_some(Field::Price))
}

/// Column positions of the recognized fields in one input file.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    positions: HashMap<Field, usize>,
    ignored: Vec<String>,
}

impl ColumnMap {
    /// Fails with every missing required column listed.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut positions = HashMap::new();
        let mut ignored = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            match recognize(header) {
                Some(field) if positions.contains_key(&field) => {
                    debug!(header, field = field.canonical(), "duplicate column ignored");
                    ignored.push(header.to_string());
                }
                Some(field) => {
                    positions.insert(field, idx);
                }
                None => ignored.push(header.to_string()),
            }
        }

        let missing: Vec<String> = Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && !positions.contains_key(f))
            .map(|f| f.canonical().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns(missing));
        }

        Ok(ColumnMap { positions, ignored })
    }

    /// Trimmed value of `field` in `record`; empty when the column is absent
    /// or the row is short.
    pub fn get<'r>(&self, record: &'r StringRecord, field: Field) -> &'r str {
        self.positions
            .get(&field)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}

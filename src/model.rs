use std::fmt;

use serde::Serialize;

/// A product row as handed over by ingestion: fields extracted, price parsed,
/// gender label still raw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProduct {
    /// Source line number, used when reporting data issues.
    pub row: usize,
    pub brand: String,
    pub product_name: String,
    pub price: f64,
    pub active_ingredient: String,
    pub inactive_ingredients: String,
    pub gender_label: Option<String>,
}

/// Axis used to pair comparable products.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Men,
    Women,
    Unisex,
    /// A label that is neither a category nor a known alias, kept verbatim.
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Unisex => "Unisex",
            Gender::Other(label) => label,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized product. Identity fields are fixed at construction; the
/// functionality label can be attached once.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    row: usize,
    brand: String,
    product_name: String,
    price: f64,
    active_ingredient: String,
    inactive_ingredients: String,
    gender: Gender,
    functionality: Option<String>,
}

impl ProductRecord {
    pub fn from_raw(raw: &RawProduct, gender: Gender) -> Self {
        ProductRecord {
            row: raw.row,
            brand: raw.brand.clone(),
            product_name: raw.product_name.clone(),
            price: raw.price,
            active_ingredient: raw.active_ingredient.clone(),
            inactive_ingredients: raw.inactive_ingredients.clone(),
            gender,
            functionality: None,
        }
    }

    /// Returns the record with `label` attached. A label that is already
    /// present is kept.
    pub fn with_functionality(mut self, label: impl Into<String>) -> Self {
        if self.functionality.is_none() {
            self.functionality = Some(label.into());
        }
        self
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn active_ingredient(&self) -> &str {
        &self.active_ingredient
    }

    pub fn inactive_ingredients(&self) -> &str {
        &self.inactive_ingredients
    }

    pub fn gender(&self) -> &Gender {
        &self.gender
    }

    pub fn functionality(&self) -> Option<&str> {
        self.functionality.as_deref()
    }
}

/// An accepted women's/men's pair from one brand.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroup {
    group_id: u32,
    women: ProductRecord,
    men: ProductRecord,
    similarity: f64,
}

impl ProductGroup {
    pub fn new(group_id: u32, women: ProductRecord, men: ProductRecord, similarity: f64) -> Self {
        ProductGroup {
            group_id,
            women,
            men,
            similarity,
        }
    }

    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    pub fn brand(&self) -> &str {
        self.women.brand()
    }

    pub fn women(&self) -> &ProductRecord {
        &self.women
    }

    pub fn men(&self) -> &ProductRecord {
        &self.men
    }

    /// Raw score in [0, 1].
    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    /// Score as a percentage rounded to one decimal.
    pub fn similarity_percent(&self) -> f64 {
        (self.similarity * 1000.0).round() / 10.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PriceDelta {
    /// Signed percentage, unrounded.
    Percent(f64),
    /// The men's price was zero, so no percentage exists.
    Indeterminate,
}

impl PriceDelta {
    pub fn percent(&self) -> Option<f64> {
        match self {
            PriceDelta::Percent(p) => Some(*p),
            PriceDelta::Indeterminate => None,
        }
    }
}

impl fmt::Display for PriceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceDelta::Percent(p) => write!(f, "{:.2}%", p),
            PriceDelta::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceDifferenceReport {
    pub group_id: u32,
    pub brand: String,
    pub women_product: String,
    pub men_product: String,
    pub women_functionality: Option<String>,
    pub men_functionality: Option<String>,
    pub women_price: f64,
    pub men_price: f64,
    pub delta: PriceDelta,
}

use std::sync::LazyLock;

use serde::Deserialize;

use crate::model::ProductRecord;

/// Known active ingredients and their labels, in match order. Every entry is
/// tested; when several occur in the same text the one listed last decides.
pub const KNOWN_INGREDIENTS: &[(&str, &str)] = &[
    ("salicylic acid", "Exfoliation and pore clearing"),
    ("benzoyl peroxide", "Antimicrobial and anti-inflammatory"),
    ("retinol", "Cell turnover and collagen production"),
    ("hyaluronic acid", "Hydration and moisture retention"),
    ("niacinamide", "Sebum regulation and pore refinement"),
    ("vitamin c", "Antioxidant and brightening"),
    ("glycolic acid", "Exfoliation and texture improvement"),
    ("lactic acid", "Gentle exfoliation and hydration"),
    ("aloe vera", "Soothing and hydration"),
    ("tea tree oil", "Antimicrobial and anti-inflammatory"),
    ("witch hazel", "Astringent and pore tightening"),
    ("zinc oxide", "Sun protection and soothing"),
    ("titanium dioxide", "Sun protection"),
    ("ceramides", "Barrier repair and hydration"),
    ("peptides", "Collagen stimulation and firming"),
    ("shea butter", "Moisturizing and softening"),
    ("glycerin", "Hydration and moisture attraction"),
    ("alpha arbutin", "Brightening and hyperpigmentation"),
    ("allantoin", "Soothing and healing"),
    ("centella asiatica", "Calming and healing"),
    ("caffeine", "Vasoconstriction and de-puffing"),
    ("collagen", "Hydration and elasticity"),
    ("cocamidopropyl betaine", "Gentle cleansing and foaming agent"),
];

/// Product-name keywords, first matching group wins.
const NAME_KEYWORDS: &[(&[&str], &str)] = &[
    (&["shampoo"], "Hair cleansing and scalp care"),
    (&["conditioner"], "Hair conditioning and detangling"),
    (&["moisturizer", "lotion"], "Moisturizing and skin hydration"),
    (&["cleanser", "wash"], "Cleansing and impurity removal"),
    (&["deodorant"], "Odor and perspiration control"),
    (&["razor", "shave"], "Shaving and skin protection"),
];

/// Generic fragments of the ingredient text, first match wins.
const INGREDIENT_FRAGMENTS: &[(&str, &str)] = &[
    ("oil", "Nourishing and conditioning oils"),
    ("extract", "Botanical skin conditioning"),
    ("butter", "Rich moisturizing and softening"),
    ("vitamin", "Vitamin nourishment"),
];

pub const FALLBACK_LABEL: &str = "General personal care and skin health";

static DEFAULT: LazyLock<Classifier> = LazyLock::new(Classifier::default);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientRule {
    pub needle: String,
    pub label: String,
}

/// Maps active-ingredient text to a functionality label using an ordered
/// ingredient table.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<IngredientRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::with_extra(Vec::new())
    }
}

impl Classifier {
    /// Built-in table followed by `extra`. Extra rules come last, so they
    /// take precedence whenever they match.
    pub fn with_extra(extra: Vec<IngredientRule>) -> Self {
        let rules = KNOWN_INGREDIENTS
            .iter()
            .map(|(needle, label)| IngredientRule {
                needle: needle.to_string(),
                label: label.to_string(),
            })
            .chain(extra.into_iter().map(|r| IngredientRule {
                needle: r.needle.trim().to_lowercase(),
                label: r.label,
            }))
            .filter(|r| !r.needle.is_empty())
            .collect();
        Classifier { rules }
    }

    pub fn rules(&self) -> &[IngredientRule] {
        &self.rules
    }

    pub fn classify<'a>(&'a self, active_ingredient: &str, product_name: &str) -> &'a str {
        let ingredient = active_ingredient.to_lowercase();

        let known = self
            .rules
            .iter()
            .filter(|r| ingredient.contains(&r.needle))
            .last();
        if let Some(rule) = known {
            return &rule.label;
        }

        let name = product_name.to_lowercase();
        if let Some((_, label)) = NAME_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|kw| name.contains(kw)))
        {
            return label;
        }

        INGREDIENT_FRAGMENTS
            .iter()
            .find(|(fragment, _)| ingredient.contains(fragment))
            .map(|(_, label)| *label)
            .unwrap_or(FALLBACK_LABEL)
    }

    /// Classification stage: returns new records with a functionality label.
    /// Records that already carry one keep it.
    pub fn classify_records(
        &self,
        records: &[ProductRecord],
        progress: &mut dyn FnMut(usize, usize),
    ) -> Vec<ProductRecord> {
        let total = records.len();
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let label = self.classify(record.active_ingredient(), record.product_name());
                progress(i + 1, total);
                record.clone().with_functionality(label)
            })
            .collect()
    }
}

/// Classify with the built-in ingredient table.
pub fn classify(active_ingredient: &str, product_name: &str) -> &'static str {
    DEFAULT.classify(active_ingredient, product_name)
}

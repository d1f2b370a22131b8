use std::collections::HashSet;

use crate::model::ProductRecord;

const FUNCTIONALITY_WEIGHT: f64 = 0.5;
const INGREDIENT_WEIGHT: f64 = 0.5;

/// Similarity in [0, 1]: 0 across brands, otherwise 0.5 for matching
/// functionality plus 0.5 times the Jaccard overlap of inactive ingredients.
pub fn score(a: &ProductRecord, b: &ProductRecord) -> f64 {
    Profile::new(a).score(&Profile::new(b))
}

/// Inactive-ingredient tokens: comma separated, trimmed, lower-cased.
pub fn ingredient_set(list: &str) -> HashSet<String> {
    list.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    let union = a.union(b).count();
    shared as f64 / union as f64
}

/// A record with its ingredient tokens parsed once, for repeated scoring.
pub(crate) struct Profile<'a> {
    pub record: &'a ProductRecord,
    ingredients: HashSet<String>,
}

impl<'a> Profile<'a> {
    pub fn new(record: &'a ProductRecord) -> Self {
        Profile {
            record,
            ingredients: ingredient_set(record.inactive_ingredients()),
        }
    }

    pub fn score(&self, other: &Profile<'_>) -> f64 {
        if self.record.brand() != other.record.brand() {
            return 0.0;
        }
        let functionality = if self.record.functionality() == other.record.functionality() {
            FUNCTIONALITY_WEIGHT
        } else {
            0.0
        };
        functionality + INGREDIENT_WEIGHT * jaccard(&self.ingredients, &other.ingredients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, RawProduct};

    fn product(brand: &str, functionality: Option<&str>, inactive: &str) -> ProductRecord {
        let raw = RawProduct {
            brand: brand.into(),
            product_name: "Item".into(),
            inactive_ingredients: inactive.into(),
            ..Default::default()
        };
        let record = ProductRecord::from_raw(&raw, Gender::Unisex);
        match functionality {
            Some(label) => record.with_functionality(label),
            None => record,
        }
    }

    #[test]
    fn matching_functionality_and_overlap() {
        let a = product("Acme", Some("Hydration"), "water, glycerin");
        let b = product("Acme", Some("Hydration"), "water, glycerin, fragrance");
        let s = score(&a, &b);
        assert!((s - (0.5 + 2.0 / 3.0 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn nothing_shared() {
        let a = product("Acme", Some("Hydration"), "water");
        let b = product("Acme", Some("Exfoliation"), "alcohol");
        assert_eq!(score(&a, &b), 0.0);
    }

    #[test]
    fn different_brands_score_zero() {
        let a = product("Acme", Some("Hydration"), "water, glycerin");
        let b = product("acme", Some("Hydration"), "water, glycerin");
        assert_eq!(score(&a, &b), 0.0);
        let c = product("Acme ", Some("Hydration"), "water, glycerin");
        assert_eq!(score(&a, &c), 0.0);
    }

    #[test]
    fn missing_functionality_on_both_sides_matches() {
        let a = product("Acme", None, "");
        let b = product("Acme", None, "");
        assert_eq!(score(&a, &b), 0.5);
    }

    #[test]
    fn empty_list_contributes_nothing() {
        let a = product("Acme", Some("X"), "");
        let b = product("Acme", Some("Y"), "water");
        assert_eq!(score(&a, &b), 0.0);
    }

    #[test]
    fn tokens_are_normalized_and_deduplicated() {
        let a = product("Acme", Some("X"), " Water ,WATER, Glycerin");
        let b = product("Acme", Some("Y"), "water,glycerin");
        assert_eq!(score(&a, &b), 0.5);
        assert_eq!(ingredient_set("a, , b,").len(), 2);
        assert!(ingredient_set("").is_empty());
    }

    #[test]
    fn symmetric_and_bounded() {
        let items = [
            product("Acme", Some("Hydration"), "water, glycerin"),
            product("Acme", Some("Hydration"), "water, glycerin"),
            product("Acme", Some("Hydration"), "water"),
            product("Acme", None, "aqua, parfum"),
            product("Bloom", Some("Hydration"), "water"),
        ];
        for a in &items {
            for b in &items {
                let s = score(a, b);
                assert!((0.0..=1.0).contains(&s), "score {} out of range", s);
                assert_eq!(s, score(b, a));
            }
        }
        assert_eq!(score(&items[0], &items[1]), 1.0);
    }
}

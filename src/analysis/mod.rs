pub mod classify;
pub mod gender;
pub mod grouping;
pub mod pricing;
pub mod similarity;
pub mod summary;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::issues::{DataIssue, IssueKind};
use crate::model::{PriceDelta, PriceDifferenceReport, ProductGroup, ProductRecord, RawProduct};
use crate::settings::Settings;
use classify::Classifier;
use gender::NameFallback;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Classify,
    Group,
    Price,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Normalize => "normalizing",
            Stage::Classify => "classifying ingredients",
            Stage::Group => "grouping products",
            Stage::Price => "comparing prices",
        }
    }
}

/// Output of every stage, kept side by side so earlier tables stay
/// available after later stages ran.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub normalized: Vec<ProductRecord>,
    pub classified: Vec<ProductRecord>,
    pub groups: Vec<ProductGroup>,
    pub differences: Vec<PriceDifferenceReport>,
    pub issues: Vec<DataIssue>,
}

impl Analysis {
    pub fn has_matches(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// Normalize → classify → group → price, each stage over the full output
/// of the previous one.
#[derive(Debug, Clone)]
pub struct Pipeline {
    classifier: Classifier,
    threshold: f64,
    fallback: NameFallback,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline {
            classifier: Classifier::default(),
            threshold: grouping::ACCEPT_THRESHOLD,
            fallback: NameFallback::default(),
        }
    }
}

impl Pipeline {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let pipeline = Pipeline {
            classifier: Classifier::with_extra(settings.extra_ingredients.clone()),
            threshold: grouping::ACCEPT_THRESHOLD,
            fallback: settings.name_fallback,
        };
        pipeline.with_threshold(settings.similarity_threshold)
    }

    pub fn with_threshold(self, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PipelineError::InvalidThreshold(threshold));
        }
        Ok(Pipeline { threshold, ..self })
    }

    pub fn with_fallback(self, fallback: NameFallback) -> Self {
        Pipeline { fallback, ..self }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// `progress` receives `(stage, done, total)` after each record.
    pub fn run(
        &self,
        products: &[RawProduct],
        progress: &mut dyn FnMut(Stage, usize, usize),
    ) -> Analysis {
        let normalized = gender::normalize_records(products, self.fallback, &mut |d, t| {
            progress(Stage::Normalize, d, t)
        });
        let classified = self
            .classifier
            .classify_records(&normalized, &mut |d, t| progress(Stage::Classify, d, t));
        let groups = grouping::group_with(&classified, self.threshold, &mut |d, t| {
            progress(Stage::Group, d, t)
        });
        let differences =
            pricing::compute_differences_with(&groups, &mut |d, t| progress(Stage::Price, d, t));

        let issues: Vec<DataIssue> = groups
            .iter()
            .zip(&differences)
            .filter(|(_, report)| report.delta == PriceDelta::Indeterminate)
            .map(|(group, _)| {
                DataIssue::new(
                    group.men().row(),
                    group.men().product_name(),
                    IssueKind::ZeroMenPrice {
                        group_id: group.group_id(),
                    },
                )
            })
            .collect();

        info!(
            products = products.len(),
            groups = groups.len(),
            indeterminate = issues.len(),
            "Analysis complete"
        );

        Analysis {
            normalized,
            classified,
            groups,
            differences,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row: usize, brand: &str, name: &str, price: f64, active: &str, inactive: &str, label: &str) -> RawProduct {
        RawProduct {
            row,
            brand: brand.into(),
            product_name: name.into(),
            price,
            active_ingredient: active.into(),
            inactive_ingredients: inactive.into(),
            gender_label: Some(label.into()).filter(|l: &String| !l.is_empty()),
        }
    }

    #[test]
    fn runs_all_stages() {
        let products = vec![
            raw(2, "Acme", "Cream W", 12.0, "Hyaluronic Acid", "water, glycerin", "Female"),
            raw(3, "Acme", "Cream M", 10.0, "Hyaluronic Acid", "water, glycerin, fragrance", "M"),
            raw(4, "Acme", "Wash", 5.0, "Salicylic Acid", "water", "Unisex"),
        ];
        let mut stages = Vec::new();
        let analysis = Pipeline::default().run(&products, &mut |stage, _, _| {
            if stages.last() != Some(&stage) {
                stages.push(stage);
            }
        });

        assert_eq!(
            stages,
            vec![Stage::Normalize, Stage::Classify, Stage::Group, Stage::Price]
        );
        assert_eq!(analysis.normalized.len(), 3);
        assert!(analysis.normalized.iter().all(|r| r.functionality().is_none()));
        assert_eq!(
            analysis.classified[2].functionality(),
            Some("Exfoliation and pore clearing")
        );
        assert!(analysis.has_matches());
        assert_eq!(analysis.groups.len(), 1);
        assert_eq!(analysis.differences[0].delta, PriceDelta::Percent(20.0));
        assert!(analysis.issues.is_empty());
    }

    #[test]
    fn zero_men_price_becomes_issue() {
        let products = vec![
            raw(2, "Bloom", "Razor W", 8.0, "", "", "F"),
            raw(3, "Bloom", "Razor M", 0.0, "", "", "M"),
        ];
        let analysis = Pipeline::default().run(&products, &mut |_, _, _| {});
        assert_eq!(analysis.groups.len(), 1);
        assert_eq!(analysis.differences[0].delta, PriceDelta::Indeterminate);
        assert_eq!(
            analysis.issues,
            vec![DataIssue::new(3, "Razor M", IssueKind::ZeroMenPrice { group_id: 1 })]
        );
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let products = vec![raw(2, "Acme", "Cream", 1.0, "", "", "Female")];
        let analysis = Pipeline::default().run(&products, &mut |_, _, _| {});
        assert!(!analysis.has_matches());
        assert!(analysis.differences.is_empty());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(matches!(
            Pipeline::default().with_threshold(1.5),
            Err(PipelineError::InvalidThreshold(t)) if t == 1.5
        ));
        assert!(Pipeline::default().with_threshold(0.0).is_ok());
    }

    #[test]
    fn fallback_policy_applies() {
        let products = vec![
            raw(2, "Acme", "Lotion for Women", 9.0, "", "water", ""),
            raw(3, "Acme", "Lotion for Men", 7.0, "", "water", ""),
        ];
        let legacy = Pipeline::default().run(&products, &mut |_, _, _| {});
        assert!(!legacy.has_matches());

        let fixed = Pipeline::default()
            .with_fallback(NameFallback::WomenFirst)
            .run(&products, &mut |_, _, _| {});
        assert_eq!(fixed.groups.len(), 1);
    }
}

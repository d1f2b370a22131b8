//! Gender price-gap analysis for personal-care products.
//!
//! Rows are normalized, their active ingredients classified, comparable
//! women's/men's products of one brand paired by similarity, and the price
//! difference of every pair reported.

pub mod analysis;
pub mod error;
pub mod export;
pub mod ingest;
pub mod issues;
pub mod model;
pub mod settings;

pub use analysis::classify::{classify, Classifier};
pub use analysis::gender::{normalize_gender, NameFallback};
pub use analysis::grouping::{group, group_with};
pub use analysis::pricing::compute_differences;
pub use analysis::similarity::score;
pub use analysis::summary::{summarize, Summary};
pub use analysis::{Analysis, Pipeline, Stage};
pub use error::{PipelineError, Result};
pub use issues::{DataIssue, IssueKind};
pub use model::{Gender, PriceDelta, PriceDifferenceReport, ProductGroup, ProductRecord, RawProduct};
pub use settings::Settings;

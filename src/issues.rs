use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Non-fatal data-quality findings. The affected record stays in the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    MissingBrand,
    UnparseablePrice { raw: String },
    NegativePrice { raw: String },
    EmptyInactiveIngredients,
    ZeroMenPrice { group_id: u32 },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::MissingBrand => f.write_str("brand is empty"),
            IssueKind::UnparseablePrice { raw } => {
                write!(f, "price {:?} is not a number; using 0", raw)
            }
            IssueKind::NegativePrice { raw } => write!(f, "price {:?} is negative; using 0", raw),
            IssueKind::EmptyInactiveIngredients => f.write_str("no inactive ingredients listed"),
            IssueKind::ZeroMenPrice { group_id } => {
                write!(f, "group {}: men's price is 0; difference indeterminate", group_id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataIssue {
    pub row: usize,
    pub product: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl DataIssue {
    pub fn new(row: usize, product: impl Into<String>, kind: IssueKind) -> Self {
        DataIssue {
            row,
            product: product.into(),
            kind,
        }
    }

    pub(crate) fn logged(self) -> Self {
        warn!(row = self.row, product = %self.product, "{}", self.kind);
        self
    }
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} ({}): {}", self.row, self.product, self.kind)
    }
}

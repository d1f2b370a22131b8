pub mod price;
pub mod schema;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::issues::{DataIssue, IssueKind};
use crate::model::RawProduct;
use schema::{ColumnMap, Field};

/// Products read from one file, with the per-row issues found on the way.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub products: Vec<RawProduct>,
    pub issues: Vec<DataIssue>,
    pub ignored_columns: Vec<String>,
}

pub fn read_path(path: &Path) -> Result<Ingested> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let ingested = read_csv(file)?;
    info!(
        "Loaded {} products from {}",
        ingested.products.len(),
        path.display()
    );
    Ok(ingested)
}

/// Read a product CSV. Any malformed row fails the whole read.
pub fn read_csv<R: Read>(reader: R) -> Result<Ingested> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PipelineError::EmptyInput);
    }
    let columns = ColumnMap::from_headers(&headers)?;

    let mut products = Vec::new();
    let mut issues = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        products.push(to_product(&columns, &record, row, &mut issues));
    }

    Ok(Ingested {
        products,
        issues,
        ignored_columns: columns.ignored().to_vec(),
    })
}

fn to_product(
    columns: &ColumnMap,
    record: &csv::StringRecord,
    row: usize,
    issues: &mut Vec<DataIssue>,
) -> RawProduct {
    let product_name = columns.get(record, Field::ProductName).to_string();
    let mut flag = |kind: IssueKind| issues.push(DataIssue::new(row, &product_name, kind).logged());

    let brand = columns.get(record, Field::Brand).to_string();
    if brand.is_empty() {
        flag(IssueKind::MissingBrand);
    }

    let price_text = columns.get(record, Field::Price);
    let price = match price::parse_price(price_text) {
        Some(p) if p >= 0.0 => p,
        Some(_) => {
            flag(IssueKind::NegativePrice {
                raw: price_text.to_string(),
            });
            0.0
        }
        None => {
            flag(IssueKind::UnparseablePrice {
                raw: price_text.to_string(),
            });
            0.0
        }
    };

    let inactive_ingredients = columns.get(record, Field::InactiveIngredients).to_string();
    if inactive_ingredients.is_empty() {
        flag(IssueKind::EmptyInactiveIngredients);
    }

    let gender_label = Some(columns.get(record, Field::GenderClassification))
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    RawProduct {
        row,
        brand,
        product_name,
        price,
        active_ingredient: columns.get(record, Field::ActiveIngredient).to_string(),
        inactive_ingredients,
        gender_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Brand,Product Name,Price (€),Active Ingredient,Inactive Ingredients,Gender Classification,URL\n";

    fn read(body: &str) -> Result<Ingested> {
        read_csv(format!("{}{}", HEADER, body).as_bytes())
    }

    #[test]
    fn reads_rows() {
        let ingested = read("Acme,Cream,€12.99,Retinol,\"water, glycerin\",Female,https://x\n").unwrap();
        assert_eq!(ingested.products.len(), 1);
        let p = &ingested.products[0];
        assert_eq!(p.row, 2);
        assert_eq!(p.brand, "Acme");
        assert_eq!(p.price, 12.99);
        assert_eq!(p.inactive_ingredients, "water, glycerin");
        assert_eq!(p.gender_label.as_deref(), Some("Female"));
        assert!(ingested.issues.is_empty());
        assert_eq!(ingested.ignored_columns, vec!["URL".to_string()]);
    }

    #[test]
    fn skips_blank_rows_and_pads_short_ones() {
        let ingested = read("\n,,,,,,\nAcme,Razor,3\n").unwrap();
        assert_eq!(ingested.products.len(), 1);
        let p = &ingested.products[0];
        assert_eq!(p.product_name, "Razor");
        assert_eq!(p.gender_label, None);
        assert_eq!(p.active_ingredient, "");
    }

    #[test]
    fn records_data_issues() {
        let ingested = read(",Mystery,free,,,M,\nAcme,Refund,-2,,water,F,\n").unwrap();
        assert_eq!(ingested.products.len(), 2);
        assert_eq!(ingested.products[0].price, 0.0);
        assert_eq!(ingested.products[1].price, 0.0);
        let kinds: Vec<&IssueKind> = ingested.issues.iter().map(|i| &i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &IssueKind::MissingBrand,
                &IssueKind::UnparseablePrice { raw: "free".into() },
                &IssueKind::EmptyInactiveIngredients,
                &IssueKind::NegativePrice { raw: "-2".into() },
            ]
        );
        assert_eq!(ingested.issues[3].row, 3);
        assert_eq!(ingested.issues[3].product, "Refund");
    }

    #[test]
    fn overflowing_price_is_unparseable() {
        let huge = "9".repeat(400);
        let ingested = read(&format!("Acme,Cream M,{},Retinol,water,M,\n", huge)).unwrap();
        assert_eq!(ingested.products[0].price, 0.0);
        assert_eq!(
            ingested.issues[0].kind,
            IssueKind::UnparseablePrice { raw: huge }
        );
    }

    #[test]
    fn missing_columns_fail() {
        let err = read_csv("Brand,Price\nAcme,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumns(ref cols) if cols.len() == 3));
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(read_csv("".as_bytes()), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn missing_file() {
        let err = read_path(Path::new("tests/fixtures/does_not_exist.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}

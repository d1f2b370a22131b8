use tracing::{debug, info};

use super::similarity::Profile;
use crate::model::{Gender, ProductGroup, ProductRecord};

/// Pairs must score strictly above this to be grouped.
pub const ACCEPT_THRESHOLD: f64 = 0.3;

/// Group with the default threshold and no progress reporting.
pub fn group(records: &[ProductRecord]) -> Vec<ProductGroup> {
    group_with(records, ACCEPT_THRESHOLD, &mut |_, _| {})
}

/// Compare every women's product with every men's product, women in the
/// outer loop, both in input order. Accepted pairs are numbered from 1 in
/// the order they are found. `progress` fires after each women's product.
pub fn group_with(
    records: &[ProductRecord],
    threshold: f64,
    progress: &mut dyn FnMut(usize, usize),
) -> Vec<ProductGroup> {
    let women = profiles(records, &Gender::Women);
    let men = profiles(records, &Gender::Men);
    debug!(women = women.len(), men = men.len(), threshold, "grouping");

    let mut groups = Vec::new();
    for (i, woman) in women.iter().enumerate() {
        for man in &men {
            let similarity = woman.score(man);
            if similarity > threshold {
                let group_id = groups.len() as u32 + 1;
                groups.push(ProductGroup::new(
                    group_id,
                    woman.record.clone(),
                    man.record.clone(),
                    similarity,
                ));
            }
        }
        progress(i + 1, women.len());
    }

    info!(
        "Grouped {} pairs from {} women's x {} men's products",
        groups.len(),
        women.len(),
        men.len()
    );
    groups
}

fn profiles<'a>(records: &'a [ProductRecord], gender: &Gender) -> Vec<Profile<'a>> {
    records
        .iter()
        .filter(|r| r.gender() == gender)
        .map(Profile::new)
        .collect()
}

use tracing::warn;

use crate::model::{PriceDelta, PriceDifferenceReport, ProductGroup};

/// One report per group, in group order.
pub fn compute_differences(groups: &[ProductGroup]) -> Vec<PriceDifferenceReport> {
    compute_differences_with(groups, &mut |_, _| {})
}

pub fn compute_differences_with(
    groups: &[ProductGroup],
    progress: &mut dyn FnMut(usize, usize),
) -> Vec<PriceDifferenceReport> {
    let total = groups.len();
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let report = report_for(group);
            progress(i + 1, total);
            report
        })
        .collect()
}

/// Women's price relative to men's, in percent. Zero men's price has no
/// defined ratio.
pub fn price_delta(women_price: f64, men_price: f64) -> PriceDelta {
    if men_price == 0.0 {
        return PriceDelta::Indeterminate;
    }
    let percent = (women_price - men_price) / men_price * 100.0;
    if percent.is_finite() {
        PriceDelta::Percent(percent)
    } else {
        PriceDelta::Indeterminate
    }
}

fn report_for(group: &ProductGroup) -> PriceDifferenceReport {
    let women = group.women();
    let men = group.men();
    let delta = price_delta(women.price(), men.price());
    if delta == PriceDelta::Indeterminate {
        warn!(
            group_id = group.group_id(),
            men_product = men.product_name(),
            "men's price is {}; price difference indeterminate",
            men.price()
        );
    }

    PriceDifferenceReport {
        group_id: group.group_id(),
        brand: group.brand().to_string(),
        women_product: women.product_name().to_string(),
        men_product: men.product_name().to_string(),
        women_functionality: women.functionality().map(str::to_string),
        men_functionality: men.functionality().map(str::to_string),
        women_price: women.price(),
        men_price: men.price(),
        delta,
    }
}

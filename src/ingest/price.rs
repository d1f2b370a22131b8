use std::sync::LazyLock;

use regex::Regex;

static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9.\-]+").unwrap());
static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)").unwrap());

/// Parse currency-formatted text such as `"€12.99"` or `"$1,299.00"`.
///
/// Everything but digits, `.` and `-` is stripped, then the longest leading
/// decimal number is read. Returns `None` when nothing numeric is left or
/// the number overflows.
pub fn parse_price(text: &str) -> Option<f64> {
    let stripped = STRIP_RE.replace_all(text, "");
    LEADING_NUMBER_RE
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|p| p.is_finite())
}

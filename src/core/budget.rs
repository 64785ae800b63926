use crate::domain::model::BudgetRange;
use regex::Regex;
use std::sync::LazyLock;

static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(\.[0-9]+)?").expect("numeral pattern is valid"));

static UPPER_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)under|below|less than|up to|upto").expect("upper-bound pattern is valid")
});

static LOWER_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)over|more than|at least|from").expect("lower-bound pattern is valid")
});

/// Reads a free-text budget ("$80-$120", "under 150", "around 200") into a range.
///
/// Never fails. Two or more numerals form an explicit range (extras ignored).
/// A single numeral is an upper bound, a lower bound or a point estimate
/// depending on the wording around it, with upper-bound phrasing checked first.
pub fn parse(raw: Option<&str>) -> BudgetRange {
    let raw = match raw {
        Some(text) if !text.trim().is_empty() => text,
        _ => return BudgetRange::default(),
    };

    // 千分位逗號先移除，"1,200" 才會被視為一個數字
    let stripped = raw.replace(',', "");
    let numbers: Vec<f64> = NUMERAL
        .find_iter(&stripped)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    let (min, max) = match numbers.as_slice() {
        [] => (None, None),
        [first, second, ..] => (Some(*first), Some(*second)),
        [only] => {
            if UPPER_BOUND.is_match(&stripped) {
                (None, Some(*only))
            } else if LOWER_BOUND.is_match(&stripped) {
                (Some(*only), None)
            } else {
                (Some(*only), Some(*only))
            }
        }
    };

    BudgetRange {
        min,
        max,
        raw: Some(raw.to_string()),
    }
}

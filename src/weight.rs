use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

// Float sums of percentages rarely land exactly on 1.0.
const TOLERANCE: f64 = 1e-6;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").expect("weight regex is valid"));

#[derive(Debug, Error, PartialEq)]
#[error(
    "The total weight of assessments cannot exceed 1. Current total weight is {existing}, and new assessments adds {added}."
)]
pub struct WeightError {
    pub existing: f64,
    pub added: f64,
}

/// Reads a printed weight as a fraction of the course grade. `"30%"` and
/// `"30"` both give `0.3`; text that doesn't start with a number gives `None`.
pub fn parse_weight(text: &str) -> Option<f64> {
    let caps = LEADING_NUMBER.captures(text)?;
    let percent = caps.get(1)?.as_str().parse::<f64>().ok()?;
    Some(percent / 100.0)
}

pub fn validate_total_weight(existing: &[f64], new: &[f64]) -> Result<(), WeightError> {
    let existing: f64 = existing.iter().sum();
    let added: f64 = new.iter().sum();
    if existing + added > 1.0 + TOLERANCE {
        return Err(WeightError { existing, added });
    }
    Ok(())
}

use crate::error::{EngineError, EngineResult};
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Leading integer of an item; anything after it is ignored
static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid leading integer regex"));

fn leading_int(item: &str) -> Option<i64> {
    LEADING_INT
        .captures(item)
        .and_then(|caps| caps[1].parse().ok())
}

/// Parse a comma-separated list of numbers
///
/// Each item contributes its leading integer (`" 12abc"` gives 12); items
/// without one are dropped. Fails when nothing usable remains.
pub fn parse_values(input: &str) -> EngineResult<Vec<i64>> {
    let values: Vec<i64> = input.split(',').filter_map(leading_int).collect();

    if values.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "no numbers found in {:?}",
            input
        )));
    }

    Ok(values)
}

/// Parse a search target with the same leading integer rule
pub fn parse_target(input: &str) -> EngineResult<i64> {
    leading_int(input).ok_or_else(|| {
        EngineError::InvalidInput(format!("search target {:?} is not a number", input))
    })
}

/// `len` values drawn uniformly from `[min, max]`
pub fn random_values(len: usize, min: i64, max: i64) -> EngineResult<Vec<i64>> {
    if min > max {
        return Err(EngineError::InvalidInput(format!(
            "value range {}..={} is empty",
            min, max
        )));
    }

    let mut rng = rand::thread_rng();
    Ok((0..len).map(|_| rng.gen_range(min..=max)).collect())
}

/// Random values in ascending order, ready for binary search
pub fn random_sorted_values(len: usize, min: i64, max: i64) -> EngineResult<Vec<i64>> {
    let mut values = random_values(len, min, max)?;
    values.sort_unstable();
    Ok(values)
}

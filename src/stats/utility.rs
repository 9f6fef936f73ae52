//! Order-aware counting helpers shared by the statistic groups.

use std::collections::HashMap;
use std::hash::Hash;

/// Most frequent value. Ties go to the value seen first. `None` for empty input.
pub fn mode<K, I>(values: I) -> Option<K>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    // value -> (count, position of first occurrence)
    let mut seen: HashMap<K, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        seen.entry(value).or_insert((0, position)).0 += 1;
    }

    seen.into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Occurrence counts in first-seen order.
pub fn value_counts<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts
}

/// Arithmetic mean of `total` over `count` items. `None` when `count` is zero.
pub fn mean(total: i64, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(total as f64 / count as f64)
}

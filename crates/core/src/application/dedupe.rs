// Order-preserving deduplication

use std::collections::HashSet;
use std::hash::Hash;

/// Drop repeated items, keeping the first occurrence of each.
pub fn dedupe<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        assert_eq!(dedupe(vec!["u1", "u1", "u2", "u1"]), vec!["u1", "u2"]);
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_dedupe_output_is_independent_of_input_order() {
        let a = dedupe(vec!["b", "a", "b", "c", "a"]);
        let b = dedupe(vec!["c", "a", "a", "b"]);
        let (mut a_sorted, mut b_sorted) = (a.clone(), b.clone());
        a_sorted.sort();
        b_sorted.sort();
        assert_eq!(a_sorted, b_sorted);
        assert_eq!(a.len(), 3);
    }
}

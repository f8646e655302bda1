use std::hash::Hash;

use indexmap::IndexMap;

/// Group rows by a derived key. Keys keep first-seen order, so downstream
/// tables are deterministic for a given input order.
pub fn group_by<T, K, F>(rows: &[T], key: F) -> IndexMap<K, Vec<&T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<&T>> = IndexMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Count rows per derived key, preserving first-seen key order.
pub fn count_by<T, K, F>(rows: &[T], key: F) -> IndexMap<K, usize>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut counts: IndexMap<K, usize> = IndexMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
}

//! Key alignment between the two sources

use crate::record::{Record, RecordSet};
use std::collections::{HashMap, HashSet};

/// First row per normalized identifier
pub fn index_by_key<'a>(set: &'a RecordSet, id_column: &str) -> HashMap<String, Record<'a>> {
    let mut index = HashMap::with_capacity(set.len());
    for record in set.records() {
        if let Some(key) = record.get(id_column).as_key() {
            // Duplicates keep the first match
            index.entry(key).or_insert(record);
        }
    }
    index
}

/// A key present in both sources with the selected row of each side
#[derive(Debug, Clone, Copy)]
pub struct AlignedPair<'a> {
    pub key: &'a str,
    pub left: Record<'a>,
    pub right: Record<'a>,
}

/// Key-indexed view of both sources
pub struct KeyAligner<'a> {
    left: HashMap<String, Record<'a>>,
    right: HashMap<String, Record<'a>>,
}

impl<'a> KeyAligner<'a> {
    pub fn new(left: &'a RecordSet, right: &'a RecordSet, id_column: &str) -> Self {
        Self {
            left: index_by_key(left, id_column),
            right: index_by_key(right, id_column),
        }
    }

    /// Keys present in both sources; iteration order is unspecified
    pub fn aligned_keys(&self) -> HashSet<&str> {
        let left: HashSet<&str> = self.left.keys().map(|k| k.as_str()).collect();
        let right: HashSet<&str> = self.right.keys().map(|k| k.as_str()).collect();
        left.intersection(&right).copied().collect()
    }

    /// Aligned pairs; keys present on one side only are dropped
    pub fn pairs(&self) -> Vec<AlignedPair<'_>> {
        self.left
            .iter()
            .filter_map(|(key, left)| {
                self.right.get(key).map(|right| AlignedPair {
                    key: key.as_str(),
                    left: *left,
                    right: *right,
                })
            })
            .collect()
    }

    pub fn left_only_count(&self) -> usize {
        self.left.keys().filter(|k| !self.right.contains_key(*k)).count()
    }

    pub fn right_only_count(&self) -> usize {
        self.right.keys().filter(|k| !self.left.contains_key(*k)).count()
    }
}

// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Row-level set arithmetic used by composite tables
//!
//! Rows are compared by value. Every function takes rows as value vectors
//! and returns the indices of the rows it keeps, so callers can carry any
//! row identity alongside.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use crate::core::Value;
use crate::storage::config::DedupStrategy;

/// Hash a row's values
#[inline]
pub fn hash_row(row: &[Value]) -> u64 {
    let mut hasher = FxHasher::default();
    for value in row {
        value.hash(&mut hasher);
    }
    hasher.finish()
}

/// Compare two rows for equality
///
/// NULLs are equal to each other here, as set operations require.
#[inline]
pub fn rows_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Indices of the first occurrence of every distinct row
pub fn distinct(rows: &[Vec<Value>], strategy: DedupStrategy) -> Vec<usize> {
    match strategy {
        DedupStrategy::Hash => distinct_hash(rows),
        DedupStrategy::Sort => distinct_sort(rows),
    }
}

/// Hash-based dedup, keeps input order
pub fn distinct_hash(rows: &[Vec<Value>]) -> Vec<usize> {
    // hash -> indices of kept rows with that hash
    let mut seen: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
    let mut kept = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let bucket = seen.entry(hash_row(row)).or_default();
        if !bucket.iter().any(|&k| rows_equal(&rows[k], row)) {
            bucket.push(idx);
            kept.push(idx);
        }
    }
    kept
}

/// Sort-based dedup, returns rows in value order
pub fn distinct_sort(rows: &[Vec<Value>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| rows[a].cmp(&rows[b]));
    order.dedup_by(|a, b| rows_equal(&rows[*a], &rows[*b]));
    order
}

/// Indices of `left` rows that also occur in `right`
///
/// Without `all` each distinct row is kept once; with `all` a row is kept
/// as many times as it occurs on both sides.
pub fn intersect(left: &[Vec<Value>], right: &[Vec<Value>], all: bool) -> Vec<usize> {
    if all {
        let mut counts = count_rows(right);
        return left
            .iter()
            .enumerate()
            .filter(|(_, row)| take_one(&mut counts, right, row))
            .map(|(idx, _)| idx)
            .collect();
    }
    let index = index_rows(right);
    let matching: Vec<usize> = (0..left.len())
        .filter(|&idx| contains(&index, right, &left[idx]))
        .collect();
    keep_distinct(left, matching)
}

/// Indices of `left` rows that do not occur in `right`
///
/// Without `all` each distinct row is kept once; with `all` every
/// occurrence in `right` cancels one occurrence in `left`.
pub fn except(left: &[Vec<Value>], right: &[Vec<Value>], all: bool) -> Vec<usize> {
    if all {
        let mut counts = count_rows(right);
        return left
            .iter()
            .enumerate()
            .filter(|(_, row)| !take_one(&mut counts, right, row))
            .map(|(idx, _)| idx)
            .collect();
    }
    let index = index_rows(right);
    let missing: Vec<usize> = (0..left.len())
        .filter(|&idx| !contains(&index, right, &left[idx]))
        .collect();
    keep_distinct(left, missing)
}

// hash -> indices of rows with that hash
fn index_rows(rows: &[Vec<Value>]) -> FxHashMap<u64, Vec<usize>> {
    let mut index: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
    for (idx, row) in rows.iter().enumerate() {
        index.entry(hash_row(row)).or_default().push(idx);
    }
    index
}

fn contains(index: &FxHashMap<u64, Vec<usize>>, rows: &[Vec<Value>], row: &[Value]) -> bool {
    index
        .get(&hash_row(row))
        .is_some_and(|bucket| bucket.iter().any(|&idx| rows_equal(&rows[idx], row)))
}

// hash -> (representative index, remaining count) per distinct row
fn count_rows(rows: &[Vec<Value>]) -> FxHashMap<u64, Vec<(usize, usize)>> {
    let mut counts: FxHashMap<u64, Vec<(usize, usize)>> = FxHashMap::default();
    for (idx, row) in rows.iter().enumerate() {
        let bucket = counts.entry(hash_row(row)).or_default();
        match bucket.iter_mut().find(|(rep, _)| rows_equal(&rows[*rep], row)) {
            Some(entry) => entry.1 += 1,
            None => bucket.push((idx, 1)),
        }
    }
    counts
}

// Consume one remaining occurrence of `row`, false if none is left
fn take_one(
    counts: &mut FxHashMap<u64, Vec<(usize, usize)>>,
    rows: &[Vec<Value>],
    row: &[Value],
) -> bool {
    let Some(bucket) = counts.get_mut(&hash_row(row)) else {
        return false;
    };
    match bucket
        .iter_mut()
        .find(|(rep, count)| *count > 0 && rows_equal(&rows[*rep], row))
    {
        Some(entry) => {
            entry.1 -= 1;
            true
        }
        None => false,
    }
}

fn keep_distinct(rows: &[Vec<Value>], candidates: Vec<usize>) -> Vec<usize> {
    let mut seen: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
    candidates
        .into_iter()
        .filter(|&idx| {
            let bucket = seen.entry(hash_row(&rows[idx])).or_default();
            if bucket.iter().any(|&k| rows_equal(&rows[k], &rows[idx])) {
                return false;
            }
            bucket.push(idx);
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[i64]) -> Vec<Vec<Value>> {
        values.iter().map(|v| vec![Value::integer(*v)]).collect()
    }

    #[test]
    fn test_hash_consistent_with_equality() {
        let a = vec![Value::integer(5), Value::text("x")];
        let b = vec![Value::float(5.0), Value::text("x")];
        assert!(rows_equal(&a, &b));
        assert_eq!(hash_row(&a), hash_row(&b));
        assert!(!rows_equal(&a, &a[..1]));
    }

    #[test]
    fn test_distinct_strategies() {
        let input = rows(&[3, 1, 3, 2, 1]);
        assert_eq!(distinct_hash(&input), vec![0, 1, 3]);
        let sorted = distinct_sort(&input);
        let values: Vec<_> = sorted.iter().map(|&i| input[i][0].clone()).collect();
        assert_eq!(values, vec![Value::integer(1), Value::integer(2), Value::integer(3)]);
        assert_eq!(distinct(&input, DedupStrategy::Sort).len(), 3);
    }

    #[test]
    fn test_nulls_are_one_distinct_row() {
        let input = vec![vec![Value::null_unknown()], vec![Value::null_unknown()]];
        assert_eq!(distinct_hash(&input), vec![0]);
        assert_eq!(distinct_sort(&input), vec![0]);
    }

    #[test]
    fn test_intersect() {
        let left = rows(&[1, 2, 2, 2, 3]);
        let right = rows(&[2, 2, 4, 1]);
        assert_eq!(intersect(&left, &right, false), vec![0, 1]);
        assert_eq!(intersect(&left, &right, true), vec![0, 1, 2]);
    }

    #[test]
    fn test_except() {
        let left = rows(&[1, 2, 2, 2, 3, 3]);
        let right = rows(&[2, 1]);
        assert_eq!(except(&left, &right, false), vec![4]);
        assert_eq!(except(&left, &right, true), vec![2, 3, 4, 5]);
    }
}

//! Multiset collection helpers.
//!
//! `union`, `intersection`, `disjunction` and `subtract` treat their inputs as
//! multisets: for every element the result holds max / min / |difference| /
//! saturating difference of its counts in the two inputs. Output order is the order
//! of first appearance, scanning `a` and then `b`.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

/// Count occurrences of each element.
pub fn count_map<T, I>(items: I) -> HashMap<T, usize>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

// Distinct elements of `a` then `b`, in first-appearance order.
fn first_appearance<'a, T: Eq + Hash>(a: &'a [T], b: &'a [T]) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    a.iter().chain(b.iter()).filter(|x| seen.insert(*x)).collect()
}

fn combine<T, F>(a: &[T], b: &[T], pick: F) -> Vec<T>
where
    T: Eq + Hash + Clone,
    F: Fn(usize, usize) -> usize,
{
    let counts_a = count_map(a.iter());
    let counts_b = count_map(b.iter());
    let mut out = Vec::new();
    for item in first_appearance(a, b) {
        let ca = counts_a.get(item).copied().unwrap_or(0);
        let cb = counts_b.get(item).copied().unwrap_or(0);
        out.extend(std::iter::repeat(item).take(pick(ca, cb)).cloned());
    }
    out
}

/// Multiset union: each element `max(count_a, count_b)` times.
///
/// ```
/// use glkit::collections::union;
/// assert_eq!(union(&["a", "b", "b", "c"], &["b", "b", "b", "d"]), vec!["a", "b", "b", "b", "c", "d"]);
/// ```
pub fn union<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    combine(a, b, usize::max)
}

/// Multiset intersection: each element `min(count_a, count_b)` times.
pub fn intersection<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    combine(a, b, usize::min)
}

/// Symmetric multiset difference: each element `|count_a - count_b|` times.
pub fn disjunction<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    combine(a, b, |x, y| x.abs_diff(y))
}

/// Elements of `a` with `b`'s occurrences removed, keeping `a`'s order.
pub fn subtract<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut remaining = count_map(b.iter());
    let mut out = Vec::with_capacity(a.len());
    for item in a {
        match remaining.get_mut(item) {
            Some(n) if *n > 0 => *n -= 1,
            _ => out.push(item.clone()),
        }
    }
    out
}

/// Distinct elements of all inputs, first-appearance order.
pub fn union_distinct<T: Eq + Hash + Clone>(lists: &[&[T]]) -> Vec<T> {
    let mut seen = HashSet::new();
    lists
        .iter()
        .flat_map(|list| list.iter())
        .filter(|x| seen.insert(*x))
        .cloned()
        .collect()
}

/// Plain concatenation of all inputs.
pub fn union_all<T: Clone>(lists: &[&[T]]) -> Vec<T> {
    lists.iter().flat_map(|list| list.iter().cloned()).collect()
}

/// Distinct elements present in every input, in the order of the first input.
pub fn intersection_distinct<T: Eq + Hash + Clone>(lists: &[&[T]]) -> Vec<T> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };
    let others: Vec<HashSet<&T>> = rest.iter().map(|l| l.iter().collect()).collect();
    let mut seen = HashSet::new();
    first
        .iter()
        .filter(|x| others.iter().all(|set| set.contains(*x)))
        .filter(|x| seen.insert(*x))
        .cloned()
        .collect()
}

/// Remove duplicates, keeping the first occurrence.
pub fn distinct<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    union_distinct(&[items])
}

pub fn contains_any<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let set: HashSet<&T> = small.iter().collect();
    large.iter().any(|x| set.contains(x))
}

/// True when every element of `b` occurs in `a` (counts ignored).
pub fn contains_all<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    let set: HashSet<&T> = a.iter().collect();
    b.iter().all(|x| set.contains(x))
}

/// Split into chunks of `size` elements; the last chunk may be shorter. A zero size
/// yields the whole input as one chunk.
pub fn split<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![items.to_vec()];
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

pub fn join<I>(items: I, separator: &str) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(&item.to_string());
    }
    out
}

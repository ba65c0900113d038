//! Ranking and selection over comparison results.

use std::cmp::Reverse;

use thiserror::Error;
use tracing::warn;

use crate::models::analysis::ComparisonResult;

/// Anything that can be ordered by match score and picked by candidate name.
pub trait Ranked {
    fn match_score(&self) -> u8;
    fn candidate_name(&self) -> &str;
}

impl Ranked for ComparisonResult {
    fn match_score(&self) -> u8 {
        self.match_score
    }

    fn candidate_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("No ranked candidate named '{0}'")]
pub struct NotFound(pub String);

/// A name lookup result. `duplicates` counts the other ranked items sharing
/// the same name; the returned item is always the highest ranked of them.
#[derive(Debug)]
pub struct Selected<'a, T> {
    pub item: &'a T,
    pub duplicates: usize,
}

impl<T> Selected<'_, T> {
    pub fn is_ambiguous(&self) -> bool {
        self.duplicates > 0
    }
}

/// Orders by `match_score` descending. The sort is stable, so equal scores
/// keep their input order.
pub fn rank_by_score<T: Ranked>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(|item| Reverse(item.match_score()));
    items
}

/// Finds a candidate by name in an already ranked slice.
pub fn select_by_name<'a, T: Ranked>(ranked: &'a [T], name: &str) -> Result<Selected<'a, T>, NotFound> {
    let wanted = name.trim();
    let mut matches = ranked
        .iter()
        .filter(|item| item.candidate_name().trim() == wanted);

    let item = matches.next().ok_or_else(|| NotFound(wanted.to_string()))?;
    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            "{} ranked candidates are named '{wanted}'; selecting the highest ranked",
            duplicates + 1
        );
    }

    Ok(Selected { item, duplicates })
}

// src/pipeline/rank.rs

//! Ordering policy for result surfaces.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::Instructor;
use crate::pipeline::SortOrder;

/// Order instructors in place.
///
/// - `Rating`: descending by effective rating
/// - `Reviews`: descending by rating count
/// - `Recent`: untouched; the server's default order is kept as is
///
/// Sorting is stable, so equal keys keep the backend's relative order.
pub fn order(instructors: &mut [Instructor], sort: SortOrder) {
    match sort {
        SortOrder::Rating => instructors.sort_by(by_rating),
        SortOrder::Reviews => instructors.sort_by(|a, b| b.total_ratings.cmp(&a.total_ratings)),
        SortOrder::Recent => {}
    }
}

fn by_rating(a: &Instructor, b: &Instructor) -> Ordering {
    b.rating().total_cmp(&a.rating())
}

/// Newest first by the timestamp `key` returns. Unknown timestamps go last.
pub fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    items.sort_by(|a, b| recency(key(a), key(b)));
}

fn recency(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Visual tier of a rank badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTier {
    Gold,
    Silver,
    Bronze,
    Plain,
}

impl BadgeTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => BadgeTier::Gold,
            2 => BadgeTier::Silver,
            3 => BadgeTier::Bronze,
            _ => BadgeTier::Plain,
        }
    }
}

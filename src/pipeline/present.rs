// src/pipeline/present.rs

//! Positional display of ranked results.

use crate::models::Instructor;
use crate::pipeline::BadgeTier;

/// An item paired with the rank shown next to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    pub rank: usize,
}

impl<T> Ranked<'_, T> {
    pub fn tier(&self) -> BadgeTier {
        BadgeTier::for_rank(self.rank)
    }
}

/// Pair each item with a sequential rank beginning at `start`.
///
/// Equal ratings still get distinct ranks, in list order.
pub fn with_ranks<T>(items: &[T], start: usize) -> Vec<Ranked<'_, T>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Ranked {
            item,
            rank: start + i,
        })
        .collect()
}

/// Where a leaderboard entry stands on the podium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodiumPosition {
    Left,
    Center,
    Right,
}

/// Display order of the podium: second place, first place, third place.
const PODIUM_LAYOUT: [(usize, PodiumPosition); 3] = [
    (1, PodiumPosition::Left),
    (0, PodiumPosition::Center),
    (2, PodiumPosition::Right),
];

/// Arrange a ranked top-3 list for podium display.
///
/// Badges keep the original ranks. Missing places are skipped without
/// renumbering the others.
pub fn podium<T>(ranked: &[T]) -> Vec<(Ranked<'_, T>, PodiumPosition)> {
    PODIUM_LAYOUT
        .iter()
        .filter_map(|&(index, position)| {
            ranked
                .get(index)
                .map(|item| (Ranked { item, rank: index + 1 }, position))
        })
        .collect()
}

/// One-line text card for an instructor.
pub fn card_line(instructor: &Instructor, rank: Option<usize>) -> String {
    let badge = rank.map(|r| format!("#{r} ")).unwrap_or_default();
    let stars = "★".repeat(instructor.star_count() as usize);
    let subject = match (instructor.exam_type.is_empty(), instructor.subject.is_empty()) {
        (false, false) => format!("{} {}", instructor.exam_type, instructor.subject),
        (false, true) => instructor.exam_type.clone(),
        (true, false) => instructor.subject.clone(),
        (true, true) => String::from("-"),
    };
    format!(
        "{badge}{} [{subject}] {stars:<5} {} ({}명) id={}",
        instructor.name,
        instructor.display_rating(),
        instructor.total_ratings,
        instructor.id
    )
}

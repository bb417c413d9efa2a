//! Free-space placement for line tickets.
//!
//! Columns are chosen through a [`FairnessCounter`] so that, over a batch,
//! free spaces spread evenly across B/I/N/G/O. The composer owns the counter;
//! a fresh composer starts every batch run from zero.

use crate::domain::model::{Cell, Column, Path, PseudoFace, COLUMN_COUNT};
use rand::seq::SliceRandom;
use rand::Rng;

/// How often each column has received a free space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FairnessCounter {
    usage: [u64; COLUMN_COUNT],
}

impl FairnessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(&self, column: Column) -> u64 {
        self.usage[column.index()]
    }

    /// Picks up to `count` distinct columns from `candidates`, least used
    /// first, with ties broken at random. The picked columns are tallied.
    pub fn pick<R: Rng + ?Sized>(&mut self, candidates: &[usize], count: usize, rng: &mut R) -> Vec<usize> {
        let mut ordered = candidates.to_vec();
        ordered.shuffle(rng);
        // stable sort keeps the shuffled order among equal counts
        ordered.sort_by_key(|&column| self.usage[column]);
        ordered.truncate(count);
        for &column in &ordered {
            self.usage[column] += 1;
        }
        ordered
    }
}

#[derive(Debug, Clone, Default)]
pub struct FreeSpaceComposer {
    fairness: FairnessCounter,
}

impl FreeSpaceComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fairness(&self) -> &FairnessCounter {
        &self.fairness
    }

    /// Brings one or two drawn lines to exactly `free_count` free spaces.
    ///
    /// * one line: the chosen columns are blanked on it.
    /// * two lines, staggered: each chosen column lands on one line only,
    ///   alternating lines from a random starting line.
    /// * two lines, not staggered: the chosen columns are blanked on both.
    ///
    /// Free cells pre-marked in the source count toward `free_count` and their
    /// columns are never chosen again. Returns `None` when the lines cannot
    /// carry exactly `free_count` frees; the caller redraws.
    pub fn compose<R: Rng + ?Sized>(
        &mut self,
        verification_id: String,
        mut lines: Vec<Path>,
        free_count: u8,
        staggered: bool,
        rng: &mut R,
    ) -> Option<PseudoFace> {
        let spread = staggered && lines.len() == 2;
        let wanted = free_count as usize;

        let Some(marked) = pre_marked_frees(&lines, spread) else {
            tracing::debug!(
                "Face {} has pre-marked frees that do not fit the layout",
                verification_id
            );
            return None;
        };
        let candidates: Vec<usize> = (0..COLUMN_COUNT)
            .filter(|&column| lines.iter().all(|line| !line[column].is_free()))
            .collect();
        if marked > wanted || candidates.len() < wanted - marked {
            tracing::debug!(
                "Face {} cannot carry {} free spaces ({} pre-marked, {} columns open)",
                verification_id,
                wanted,
                marked,
                candidates.len()
            );
            return None;
        }
        let columns = self.fairness.pick(&candidates, wanted - marked, rng);

        if spread {
            let start = rng.gen_range(0..2);
            for (turn, &column) in columns.iter().enumerate() {
                lines[(start + turn) % 2][column] = Cell::Free;
            }
        } else {
            for line in lines.iter_mut() {
                for &column in &columns {
                    line[column] = Cell::Free;
                }
            }
        }

        Some(PseudoFace::Lines {
            verification_id,
            lines,
        })
    }
}

/// How many frees the source already placed, or `None` when they break the
/// layout: staggered lines need each free in its own column, other layouts
/// need the same free columns on every line.
fn pre_marked_frees(lines: &[Path], spread: bool) -> Option<usize> {
    let columns: Vec<Vec<usize>> = lines
        .iter()
        .map(|line| (0..COLUMN_COUNT).filter(|&c| line[c].is_free()).collect())
        .collect();

    if spread {
        let total = columns.iter().map(Vec::len).sum();
        let mut distinct = columns.concat();
        distinct.sort_unstable();
        distinct.dedup();
        (distinct.len() == total).then_some(total)
    } else if columns.windows(2).all(|pair| pair[0] == pair[1]) {
        Some(columns.first().map_or(0, Vec::len))
    } else {
        None
    }
}

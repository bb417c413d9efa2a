//! Expansion of a pseudo-face into every concrete combination it can win with.
//!
//! Lines are transposed into five per-column candidate lists. A column that
//! holds a free marker on any line is widened to the whole column domain, so
//! the ticket claims every outcome that free space could match. The result
//! is the cartesian product of the five lists.

use crate::domain::model::{Cell, Column, Combination, PseudoFace, Spot, COLUMN_COUNT};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionMode {
    /// Tuples keep B/I/N/G/O order.
    #[default]
    ColumnOrder,
    /// Tuples are sorted ascending, for consumers that ignore column order.
    Sorted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CombinationExpander {
    mode: ExpansionMode,
}

impl CombinationExpander {
    pub fn new(mode: ExpansionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExpansionMode {
        self.mode
    }

    pub fn expand(&self, face: &PseudoFace) -> HashSet<Combination> {
        let columns = match face {
            PseudoFace::Lines { lines, .. } => transpose_lines(lines),
            PseudoFace::EitherOr { spots, .. } => spot_columns(spots),
        };
        self.product(&columns)
    }

    fn product(&self, columns: &[Vec<u8>; COLUMN_COUNT]) -> HashSet<Combination> {
        let capacity = columns.iter().map(Vec::len).product();
        let mut combinations = HashSet::with_capacity(capacity);
        for &b in &columns[0] {
            for &i in &columns[1] {
                for &n in &columns[2] {
                    for &g in &columns[3] {
                        for &o in &columns[4] {
                            let mut combination = [b, i, n, g, o];
                            if self.mode == ExpansionMode::Sorted {
                                combination.sort_unstable();
                            }
                            combinations.insert(combination);
                        }
                    }
                }
            }
        }
        combinations
    }
}

fn transpose_lines(lines: &[[Cell; COLUMN_COUNT]]) -> [Vec<u8>; COLUMN_COUNT] {
    std::array::from_fn(|index| {
        let column = Column::ALL[index];
        if lines.iter().any(|line| line[index].is_free()) {
            return column.domain().collect();
        }
        let mut values: Vec<u8> = lines.iter().filter_map(|line| line[index].number()).collect();
        values.dedup();
        values
    })
}

fn spot_columns(spots: &[Spot; COLUMN_COUNT]) -> [Vec<u8>; COLUMN_COUNT] {
    std::array::from_fn(|index| match spots[index] {
        Spot::Single(n) => vec![n],
        Spot::EitherOr(a, b) => vec![a, b],
        Spot::Free => Column::ALL[index].domain().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(values: [u8; 5]) -> [Cell; 5] {
        values.map(Cell::Number)
    }

    fn lines_face(lines: Vec<[Cell; 5]>) -> PseudoFace {
        PseudoFace::Lines {
            verification_id: "1".to_string(),
            lines,
        }
    }

    #[test]
    fn test_plain_line_expands_to_itself() {
        let expander = CombinationExpander::default();
        let combinations = expander.expand(&lines_face(vec![line([5, 20, 35, 50, 65])]));
        assert_eq!(combinations.len(), 1);
        assert!(combinations.contains(&[5, 20, 35, 50, 65]));
    }

    #[test]
    fn test_free_slot_claims_the_whole_column() {
        let expander = CombinationExpander::default();
        let mut free_line = line([5, 20, 35, 50, 65]);
        free_line[2] = Cell::Free;
        let combinations = expander.expand(&lines_face(vec![free_line]));
        assert_eq!(combinations.len(), 15);
        for n in 31..=45u8 {
            assert!(combinations.contains(&[5, 20, n, 50, 65]));
        }
    }

    #[test]
    fn test_two_lines_expand_to_column_product() {
        let expander = CombinationExpander::default();
        let face = lines_face(vec![line([1, 16, 31, 46, 61]), line([2, 17, 32, 47, 62])]);
        let combinations = expander.expand(&face);
        assert_eq!(combinations.len(), 32);
        assert!(combinations.contains(&[1, 16, 31, 46, 61]));
        assert!(combinations.contains(&[2, 17, 32, 47, 62]));
        assert!(combinations.contains(&[1, 17, 31, 47, 61]));
    }

    #[test]
    fn test_staggered_free_widens_only_its_column() {
        let expander = CombinationExpander::default();
        let mut first = line([1, 16, 31, 46, 61]);
        first[0] = Cell::Free;
        let face = lines_face(vec![first, line([2, 17, 32, 47, 62])]);
        assert_eq!(expander.expand(&face).len(), 15 * 16);
    }

    #[test]
    fn test_either_or_spots() {
        let expander = CombinationExpander::default();
        let face = PseudoFace::EitherOr {
            verification_id: "4".to_string(),
            spots: [
                Spot::EitherOr(1, 2),
                Spot::Single(16),
                Spot::Free,
                Spot::Single(46),
                Spot::EitherOr(61, 70),
            ],
        };
        let combinations = expander.expand(&face);
        assert_eq!(combinations.len(), 2 * 15 * 2);
        assert!(combinations.contains(&[2, 16, 40, 46, 70]));
    }

    #[test]
    fn test_sorted_mode_normalizes_tuples() {
        let expander = CombinationExpander::new(ExpansionMode::Sorted);
        let face = lines_face(vec![line([15, 16, 31, 46, 61])]);
        let combinations = expander.expand(&face);
        assert!(combinations.contains(&[15, 16, 31, 46, 61]));

        let either_or = PseudoFace::EitherOr {
            verification_id: "5".to_string(),
            spots: [
                Spot::Single(3),
                Spot::Single(16),
                Spot::Single(31),
                Spot::Single(46),
                Spot::Single(61),
            ],
        };
        let sorted = expander.expand(&either_or);
        let mut expected = [3, 16, 31, 46, 61];
        expected.sort_unstable();
        assert!(sorted.contains(&expected));
        assert_eq!(expander.mode(), ExpansionMode::Sorted);
    }
}

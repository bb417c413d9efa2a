use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;

pub const COLUMN_COUNT: usize = 5;
pub const COLUMN_SPAN: u8 = 15;

/// One winning combination: the numbers that must be called, one per column.
pub type Combination = [u8; COLUMN_COUNT];

/// A bingo line, one cell per column B/I/N/G/O.
pub type Path = [Cell; COLUMN_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    B,
    I,
    N,
    G,
    O,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [Column::B, Column::I, Column::N, Column::G, Column::O];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The 15 numbers that can appear in this column (B = 1..=15, ... O = 61..=75).
    pub fn domain(self) -> RangeInclusive<u8> {
        let low = self.index() as u8 * COLUMN_SPAN + 1;
        low..=low + COLUMN_SPAN - 1
    }

    pub fn contains(self, number: u8) -> bool {
        self.domain().contains(&number)
    }

    pub fn of(number: u8) -> Option<Column> {
        Self::ALL.into_iter().find(|column| column.contains(number))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Column::B => "B",
            Column::I => "I",
            Column::N => "N",
            Column::G => "G",
            Column::O => "O",
        };
        f.write_str(letter)
    }
}

/// A single printed cell of a line ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Number(u8),
    Free,
}

impl Cell {
    pub fn is_free(self) -> bool {
        matches!(self, Cell::Free)
    }

    pub fn number(self) -> Option<u8> {
        match self {
            Cell::Number(n) => Some(n),
            Cell::Free => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Free => Ok(()),
        }
    }
}

/// One catalog entry: a verification id and the lines still available under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingoFace {
    pub verification_id: String,
    pub paths: Vec<Path>,
}

impl BingoFace {
    pub fn new(verification_id: impl Into<String>, paths: Vec<Path>) -> Self {
        Self {
            verification_id: verification_id.into(),
            paths,
        }
    }

    /// Faces need at least two lines to be drawn from.
    pub fn is_drawable(&self) -> bool {
        self.paths.len() >= 2
    }
}

/// A column of an either-or ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spot {
    Single(u8),
    EitherOr(u8, u8),
    Free,
}

impl Spot {
    pub fn printed(self) -> Vec<String> {
        match self {
            Spot::Single(n) => vec![n.to_string()],
            Spot::EitherOr(a, b) => vec![a.to_string(), b.to_string()],
            Spot::Free => vec![String::new()],
        }
    }
}

/// A ticket face before expansion: lines with free markers, or either-or spots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoFace {
    Lines {
        verification_id: String,
        lines: Vec<Path>,
    },
    EitherOr {
        verification_id: String,
        spots: [Spot; COLUMN_COUNT],
    },
}

impl PseudoFace {
    pub fn verification_id(&self) -> &str {
        match self {
            PseudoFace::Lines {
                verification_id, ..
            }
            | PseudoFace::EitherOr {
                verification_id, ..
            } => verification_id,
        }
    }

    /// Count of free slots across every line (or spot).
    pub fn free_count(&self) -> usize {
        match self {
            PseudoFace::Lines { lines, .. } => lines
                .iter()
                .map(|line| line.iter().filter(|cell| cell.is_free()).count())
                .sum(),
            PseudoFace::EitherOr { spots, .. } => {
                spots.iter().filter(|spot| **spot == Spot::Free).count()
            }
        }
    }

    /// The record handed to the ticket layer: `[verification_id, rows]`.
    pub fn to_record(&self) -> TicketRecord {
        let rows = match self {
            PseudoFace::Lines { lines, .. } => lines
                .iter()
                .map(|line| line.iter().map(ToString::to_string).collect())
                .collect(),
            PseudoFace::EitherOr { spots, .. } => spots.iter().map(|spot| spot.printed()).collect(),
        };
        TicketRecord(self.verification_id().to_string(), rows)
    }
}

impl Serialize for PseudoFace {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// `[verification_id, rows]` where each row is a list of printed strings and
/// `""` marks a free cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord(pub String, pub Vec<Vec<String>>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSize {
    #[default]
    Standard,
    Extended,
}

impl CatalogSize {
    pub fn from_extended(extended: bool) -> Self {
        if extended {
            CatalogSize::Extended
        } else {
            CatalogSize::Standard
        }
    }
}

impl fmt::Display for CatalogSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSize::Standard => f.write_str("standard"),
            CatalogSize::Extended => f.write_str("extended"),
        }
    }
}

/// What kind of bingo ticket a batch request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TicketCategory {
    SingleLine { free_spaces: u8 },
    DoubleLine { staggered: bool, free_spaces: u8 },
    EitherOr { free_spaces: u8, either_or: u8 },
}

impl TicketCategory {
    /// Builds a category from the flat fields used in plan files.
    ///
    /// A staggered double line with no free spaces is the same ticket as a
    /// non-staggered one, so it is normalized.
    pub fn from_parts(lines: u8, staggered: bool, free_spaces: u8, either_or: u8) -> Option<Self> {
        match (lines, either_or) {
            (1, 0) => Some(TicketCategory::SingleLine { free_spaces }),
            (1, n) => Some(TicketCategory::EitherOr {
                free_spaces,
                either_or: n,
            }),
            (2, 0) => Some(TicketCategory::DoubleLine {
                staggered: staggered && free_spaces > 0,
                free_spaces,
            }),
            _ => None,
        }
    }

    pub fn lines(self) -> u8 {
        match self {
            TicketCategory::DoubleLine { .. } => 2,
            _ => 1,
        }
    }

    pub fn free_spaces(self) -> u8 {
        match self {
            TicketCategory::SingleLine { free_spaces }
            | TicketCategory::DoubleLine { free_spaces, .. }
            | TicketCategory::EitherOr { free_spaces, .. } => free_spaces,
        }
    }

    /// Size of the expanded winning set of one ticket in this category.
    pub fn theoretical_combinations(self) -> u64 {
        let span = COLUMN_SPAN as u64;
        match self {
            TicketCategory::SingleLine { free_spaces } => span.pow(free_spaces as u32),
            TicketCategory::DoubleLine { free_spaces, .. } => {
                span.pow(free_spaces as u32) * 2u64.pow(COLUMN_COUNT as u32 - free_spaces as u32)
            }
            TicketCategory::EitherOr {
                free_spaces,
                either_or,
            } => span.pow(free_spaces as u32) * 2u64.pow(either_or as u32),
        }
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketCategory::SingleLine { free_spaces } => {
                write!(f, "1 line, {} free", free_spaces)
            }
            TicketCategory::DoubleLine {
                staggered,
                free_spaces,
            } => write!(
                f,
                "2 lines{}, {} free",
                if *staggered { " staggered" } else { "" },
                free_spaces
            ),
            TicketCategory::EitherOr {
                free_spaces,
                either_or,
            } => write!(f, "1 line, {} free, {} either-or", free_spaces, either_or),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_domains_partition_one_to_seventy_five() {
        assert_eq!(Column::B.domain(), 1..=15);
        assert_eq!(Column::N.domain(), 31..=45);
        assert_eq!(Column::O.domain(), 61..=75);
        for n in 1..=75u8 {
            let owners = Column::ALL.iter().filter(|c| c.contains(n)).count();
            assert_eq!(owners, 1, "{} should belong to exactly one column", n);
        }
        assert_eq!(Column::of(0), None);
        assert_eq!(Column::of(76), None);
        assert_eq!(Column::of(46), Some(Column::G));
    }

    #[test]
    fn test_category_normalization() {
        assert_eq!(
            TicketCategory::from_parts(2, true, 0, 0),
            Some(TicketCategory::DoubleLine {
                staggered: false,
                free_spaces: 0
            })
        );
        assert_eq!(
            TicketCategory::from_parts(1, false, 2, 1),
            Some(TicketCategory::EitherOr {
                free_spaces: 2,
                either_or: 1
            })
        );
        assert_eq!(TicketCategory::from_parts(2, false, 0, 1), None);
        assert_eq!(TicketCategory::from_parts(3, false, 0, 0), None);
    }

    #[test]
    fn test_theoretical_combinations() {
        assert_eq!(
            TicketCategory::SingleLine { free_spaces: 0 }.theoretical_combinations(),
            1
        );
        assert_eq!(
            TicketCategory::DoubleLine {
                staggered: true,
                free_spaces: 3
            }
            .theoretical_combinations(),
            13_500
        );
        assert_eq!(
            TicketCategory::EitherOr {
                free_spaces: 1,
                either_or: 2
            }
            .theoretical_combinations(),
            60
        );
    }

    #[test]
    fn test_ticket_record_shapes() {
        let lines = PseudoFace::Lines {
            verification_id: "1042".to_string(),
            lines: vec![[
                Cell::Number(1),
                Cell::Free,
                Cell::Number(31),
                Cell::Number(46),
                Cell::Number(61),
            ]],
        };
        let json = serde_json::to_string(&lines).unwrap();
        assert_eq!(json, r#"["1042",[["1","","31","46","61"]]]"#);

        let either_or = PseudoFace::EitherOr {
            verification_id: "7".to_string(),
            spots: [
                Spot::Single(3),
                Spot::EitherOr(20, 22),
                Spot::Free,
                Spot::Single(50),
                Spot::Single(70),
            ],
        };
        let record = either_or.to_record();
        assert_eq!(record.1[1], vec!["20".to_string(), "22".to_string()]);
        assert_eq!(record.1[2], vec![String::new()]);
        assert_eq!(either_or.free_count(), 1);
    }
}

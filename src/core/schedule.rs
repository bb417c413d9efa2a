//! Category precedence by combinatorial yield.
//!
//! Categories whose tickets claim the most combinations are generated first
//! and the nearly unique ones last. Equal yields keep the order listed here.

use crate::domain::model::TicketCategory;
use crate::domain::model::TicketCategory::{DoubleLine, EitherOr, SingleLine};

pub const YIELD_TABLE: [(TicketCategory, u64); 25] = [
    (DoubleLine { staggered: true, free_spaces: 3 }, 13_500),
    (DoubleLine { staggered: false, free_spaces: 3 }, 13_500),
    (EitherOr { free_spaces: 3, either_or: 2 }, 13_500),
    (EitherOr { free_spaces: 3, either_or: 1 }, 6_750),
    (SingleLine { free_spaces: 3 }, 3_375),
    (DoubleLine { staggered: true, free_spaces: 2 }, 1_800),
    (DoubleLine { staggered: false, free_spaces: 2 }, 1_800),
    (EitherOr { free_spaces: 2, either_or: 3 }, 1_800),
    (EitherOr { free_spaces: 2, either_or: 2 }, 900),
    (EitherOr { free_spaces: 2, either_or: 1 }, 450),
    (DoubleLine { staggered: true, free_spaces: 1 }, 240),
    (DoubleLine { staggered: false, free_spaces: 1 }, 240),
    (EitherOr { free_spaces: 1, either_or: 4 }, 240),
    (SingleLine { free_spaces: 2 }, 225),
    (EitherOr { free_spaces: 1, either_or: 3 }, 120),
    (EitherOr { free_spaces: 1, either_or: 2 }, 60),
    (DoubleLine { staggered: false, free_spaces: 0 }, 32),
    (EitherOr { free_spaces: 0, either_or: 5 }, 32),
    (EitherOr { free_spaces: 1, either_or: 1 }, 30),
    (EitherOr { free_spaces: 0, either_or: 4 }, 16),
    (SingleLine { free_spaces: 1 }, 15),
    (EitherOr { free_spaces: 0, either_or: 3 }, 8),
    (EitherOr { free_spaces: 0, either_or: 2 }, 4),
    (EitherOr { free_spaces: 0, either_or: 1 }, 2),
    (SingleLine { free_spaces: 0 }, 1),
];

/// Position of `category` in the generation order, or `None` if unsupported.
pub fn precedence(category: TicketCategory) -> Option<usize> {
    YIELD_TABLE.iter().position(|(listed, _)| *listed == category)
}

pub fn yield_of(category: TicketCategory) -> Option<u64> {
    YIELD_TABLE
        .iter()
        .find(|(listed, _)| *listed == category)
        .map(|(_, combinations)| *combinations)
}

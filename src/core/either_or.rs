//! Single-line tickets whose spots may match on one of two printed values.

use crate::core::catalog::{DrawnPair, FaceCatalog};
use crate::core::expander::CombinationExpander;
use crate::domain::model::{PseudoFace, Spot, TicketCategory, COLUMN_COUNT};
use crate::utils::error::FaceExhaustion;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct EitherOrComposer {
    expander: CombinationExpander,
    max_redraws: u32,
    // which candidate the next single-valued spot keeps
    keep_second: bool,
}

impl EitherOrComposer {
    pub fn new(max_redraws: u32) -> Self {
        Self {
            expander: CombinationExpander::default(),
            max_redraws,
            keep_second: false,
        }
    }

    /// Draws path pairs until one yields a ticket whose combinations are not
    /// yet taken, commits them and returns the ticket.
    ///
    /// Each column of the pair holds two candidates. After shuffling column
    /// order, `either_or_count` columns keep both, `free_count` become free
    /// and the rest keep one candidate, alternating which one is dropped.
    pub fn generate_one<R: Rng + ?Sized>(
        &mut self,
        catalog: &mut FaceCatalog,
        free_count: u8,
        either_or_count: u8,
        rng: &mut R,
    ) -> Result<PseudoFace, FaceExhaustion> {
        let either_or = (either_or_count as usize).min(COLUMN_COUNT);
        let free = (free_count as usize).min(COLUMN_COUNT - either_or);

        for _ in 0..=self.max_redraws {
            let pair = catalog.draw_pair(rng)?;
            let Some(candidates) = candidate_columns(&pair) else {
                tracing::debug!(
                    "Skipping face {} with pre-marked free cells",
                    pair.verification_id
                );
                continue;
            };

            let mut order: Vec<usize> = (0..COLUMN_COUNT).collect();
            order.shuffle(rng);

            let mut spots = [Spot::Free; COLUMN_COUNT];
            for (rank, &column) in order.iter().enumerate() {
                let (first, second) = candidates[column];
                spots[column] = if rank < either_or {
                    Spot::EitherOr(first, second)
                } else if rank < either_or + free {
                    Spot::Free
                } else {
                    self.reduce(first, second)
                };
            }

            let face = PseudoFace::EitherOr {
                verification_id: pair.verification_id,
                spots,
            };
            let combinations = self.expander.expand(&face);
            if catalog.is_collision_free(&combinations) {
                catalog.commit(combinations);
                return Ok(face);
            }
            tracing::debug!(
                "Either-or draw from face {} collided with the ledger",
                face.verification_id()
            );
        }

        Err(FaceExhaustion::redraws_exceeded(
            TicketCategory::EitherOr {
                free_spaces: free as u8,
                either_or: either_or as u8,
            },
            self.max_redraws,
        ))
    }

    /// Generates `quantity` tickets or fails as a whole on the first exhaustion.
    pub fn generate_batch<R: Rng + ?Sized>(
        &mut self,
        catalog: &mut FaceCatalog,
        quantity: usize,
        free_count: u8,
        either_or_count: u8,
        rng: &mut R,
    ) -> Result<Vec<PseudoFace>, FaceExhaustion> {
        (0..quantity)
            .map(|_| self.generate_one(catalog, free_count, either_or_count, rng))
            .collect()
    }

    fn reduce(&mut self, first: u8, second: u8) -> Spot {
        let kept = if self.keep_second { second } else { first };
        self.keep_second = !self.keep_second;
        Spot::Single(kept)
    }
}

fn candidate_columns(pair: &DrawnPair) -> Option<[(u8, u8); COLUMN_COUNT]> {
    let mut candidates = [(0, 0); COLUMN_COUNT];
    for (column, slot) in candidates.iter_mut().enumerate() {
        *slot = (pair.first[column].number()?, pair.second[column].number()?);
    }
    Some(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::DEFAULT_MAX_RESHUFFLES;
    use crate::domain::model::{BingoFace, Cell};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_path_face(id: usize, offset: u8) -> BingoFace {
        let first = [1, 16, 31, 46, 61].map(|n: u8| Cell::Number(n + offset));
        let second = [1, 16, 31, 46, 61].map(|n: u8| Cell::Number(n + offset + 1));
        BingoFace::new(id.to_string(), vec![first, second])
    }

    fn spots_of(face: &PseudoFace) -> [Spot; COLUMN_COUNT] {
        match face {
            PseudoFace::EitherOr { spots, .. } => *spots,
            PseudoFace::Lines { .. } => panic!("expected spots"),
        }
    }

    #[test]
    fn test_spot_counts_match_request() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let faces = (0..7).map(|i| two_path_face(i, i as u8 * 2)).collect();
        let mut catalog = FaceCatalog::from_faces(faces, DEFAULT_MAX_RESHUFFLES, &mut rng);
        let mut composer = EitherOrComposer::new(100);

        let face = composer.generate_one(&mut catalog, 1, 2, &mut rng).unwrap();
        let spots = spots_of(&face);
        let either_or = spots.iter().filter(|s| matches!(s, Spot::EitherOr(..))).count();
        let free = spots.iter().filter(|s| matches!(s, Spot::Free)).count();
        let single = spots.iter().filter(|s| matches!(s, Spot::Single(_))).count();
        assert_eq!((either_or, free, single), (2, 1, 2));
        assert_eq!(catalog.ledger().len(), 2 * 2 * 15);
    }

    #[test]
    fn test_collision_causes_redraw_then_exhaustion() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        // every face is identical, so only the first draw can be accepted
        let faces = (0..3).map(|i| two_path_face(i, 0)).collect();
        let mut catalog = FaceCatalog::from_faces(faces, DEFAULT_MAX_RESHUFFLES, &mut rng);
        let mut composer = EitherOrComposer::new(100);

        composer.generate_one(&mut catalog, 0, 5, &mut rng).unwrap();
        let err = composer.generate_one(&mut catalog, 0, 5, &mut rng).unwrap_err();
        assert_eq!(err.kind, crate::utils::error::ExhaustionKind::PoolEmpty);
    }

    #[test]
    fn test_redraw_budget_is_enforced() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let faces = (0..10).map(|i| two_path_face(i, 0)).collect();
        let mut catalog = FaceCatalog::from_faces(faces, DEFAULT_MAX_RESHUFFLES, &mut rng);
        let mut composer = EitherOrComposer::new(2);

        composer.generate_one(&mut catalog, 0, 5, &mut rng).unwrap();
        let err = composer.generate_one(&mut catalog, 0, 5, &mut rng).unwrap_err();
        assert_eq!(err.kind, crate::utils::error::ExhaustionKind::RedrawsExceeded);
        // the first attempt plus two redraws
        assert_eq!(catalog.remaining_face_count(), 10 - 1 - 3);
    }

    #[test]
    fn test_generate_batch_fails_as_a_whole() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let faces = (0..2).map(|i| two_path_face(i, i as u8 * 4)).collect();
        let mut catalog = FaceCatalog::from_faces(faces, DEFAULT_MAX_RESHUFFLES, &mut rng);
        let mut composer = EitherOrComposer::new(10);

        assert!(composer
            .generate_batch(&mut catalog, 3, 0, 1, &mut rng)
            .is_err());
    }

    #[test]
    fn test_reduced_spots_alternate_candidates() {
        let mut composer = EitherOrComposer::new(0);
        assert_eq!(composer.reduce(3, 9), Spot::Single(3));
        assert_eq!(composer.reduce(3, 9), Spot::Single(9));
        assert_eq!(composer.reduce(3, 9), Spot::Single(3));
    }
}

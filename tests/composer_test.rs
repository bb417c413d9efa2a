mod common;

use bingo_faces::core::catalog::DEFAULT_MAX_RESHUFFLES;
use bingo_faces::core::either_or::EitherOrComposer;
use bingo_faces::core::free_space::FreeSpaceComposer;
use bingo_faces::domain::model::{BingoFace, PseudoFace, Spot, COLUMN_COUNT};
use bingo_faces::FaceCatalog;
use common::{free_columns, synthetic_faces};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};

#[test]
fn test_either_or_reduction_keeps_original_candidates() {
    let faces = synthetic_faces(1_300, 2, 31);
    let by_id: HashMap<String, BingoFace> = faces
        .iter()
        .map(|face| (face.verification_id.clone(), face.clone()))
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(32);
    let mut catalog = FaceCatalog::from_faces(faces, DEFAULT_MAX_RESHUFFLES, &mut rng);
    let tickets = EitherOrComposer::new(100)
        .generate_batch(&mut catalog, 1_000, 0, 1, &mut rng)
        .unwrap();

    let mut reduced = 0usize;
    let mut kept_first = 0usize;
    for ticket in &tickets {
        let PseudoFace::EitherOr {
            verification_id,
            spots,
        } = ticket
        else {
            panic!("expected an either-or ticket");
        };
        let source = &by_id[verification_id];
        for (column, spot) in spots.iter().enumerate() {
            let first = source.paths[0][column].number().unwrap();
            let second = source.paths[1][column].number().unwrap();
            match *spot {
                Spot::Single(value) => {
                    assert!(value == first || value == second);
                    reduced += 1;
                    if value == first {
                        kept_first += 1;
                    }
                }
                Spot::EitherOr(a, b) => {
                    assert_eq!(HashSet::from([a, b]), HashSet::from([first, second]));
                }
                Spot::Free => panic!("no free spaces were requested"),
            }
        }
    }

    assert_eq!(reduced, 1_000 * (COLUMN_COUNT - 1));
    let ratio = kept_first as f64 / reduced as f64;
    assert!(
        (0.45..=0.55).contains(&ratio),
        "first candidate kept {:.3} of the time",
        ratio
    );
}

#[test]
fn test_free_spaces_never_share_a_column() {
    let mut rng = ChaCha8Rng::seed_from_u64(33);
    let mut composer = FreeSpaceComposer::new();

    for (index, face) in synthetic_faces(400, 2, 34).into_iter().enumerate() {
        let wanted = index % 4;
        let staggered = index % 3 != 0;

        let single = composer.compose(
            face.verification_id.clone(),
            vec![face.paths[0]],
            wanted as u8,
            false,
            &mut rng,
        )
        .unwrap();
        let PseudoFace::Lines { lines, .. } = &single else {
            panic!("expected lines");
        };
        assert_eq!(free_columns(&lines[0]).len(), wanted);

        let double = composer.compose(
            face.verification_id,
            face.paths,
            wanted as u8,
            staggered,
            &mut rng,
        )
        .unwrap();
        let PseudoFace::Lines { lines, .. } = &double else {
            panic!("expected lines");
        };
        if staggered {
            let mut columns: Vec<usize> = lines.iter().flat_map(free_columns).collect();
            let total = columns.len();
            columns.sort_unstable();
            columns.dedup();
            assert_eq!(columns.len(), total, "staggered frees share a column");
            assert_eq!(total, wanted);
        } else {
            assert_eq!(free_columns(&lines[0]).len(), wanted);
            assert_eq!(free_columns(&lines[0]), free_columns(&lines[1]));
        }
    }
}

#[test]
fn test_either_or_free_spots_match_the_request() {
    let mut rng = ChaCha8Rng::seed_from_u64(35);
    let mut catalog = FaceCatalog::from_faces(synthetic_faces(2_000, 2, 36), DEFAULT_MAX_RESHUFFLES, &mut rng);

    let tickets = EitherOrComposer::new(1_000)
        .generate_batch(&mut catalog, 20, 2, 2, &mut rng)
        .unwrap();

    for ticket in &tickets {
        let PseudoFace::EitherOr { spots, .. } = ticket else {
            panic!("expected an either-or ticket");
        };
        let count = |wanted: fn(&Spot) -> bool| spots.iter().filter(|spot| wanted(spot)).count();
        assert_eq!(count(|spot| *spot == Spot::Free), 2);
        assert_eq!(count(|spot| matches!(spot, Spot::EitherOr(..))), 2);
        assert_eq!(count(|spot| matches!(spot, Spot::Single(_))), 1);
    }
}

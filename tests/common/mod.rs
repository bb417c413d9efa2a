#![allow(dead_code)]

use bingo_faces::core::expander::CombinationExpander;
use bingo_faces::domain::model::{BingoFace, Cell, Column, Combination, Path, PseudoFace, COLUMN_COUNT};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Random in-domain faces whose paths never share a value in any column.
pub fn synthetic_faces(count: usize, paths_per_face: usize, seed: u64) -> Vec<BingoFace> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (1..=count)
        .map(|id| {
            let columns: Vec<Vec<u8>> = Column::ALL
                .iter()
                .map(|column| {
                    let domain: Vec<u8> = column.domain().collect();
                    domain
                        .choose_multiple(&mut rng, paths_per_face)
                        .copied()
                        .collect()
                })
                .collect();
            let paths = (0..paths_per_face)
                .map(|p| std::array::from_fn(|c| Cell::Number(columns[c][p])))
                .collect();
            BingoFace::new((1000 + id).to_string(), paths)
        })
        .collect()
}

pub fn path(values: [u8; COLUMN_COUNT]) -> Path {
    values.map(Cell::Number)
}

/// Renders faces in the `<faceId>.<line>,B,I,N,G,O` face-list format.
pub fn face_list_csv(faces: &[BingoFace]) -> String {
    let mut out = String::new();
    for face in faces {
        for (line, path) in face.paths.iter().enumerate() {
            let cells: Vec<String> = path.iter().map(ToString::to_string).collect();
            out.push_str(&format!("{}.{},{}\n", face.verification_id, line + 1, cells.join(",")));
        }
    }
    out
}

pub fn expand(face: &PseudoFace) -> HashSet<Combination> {
    CombinationExpander::default().expand(face)
}

pub fn free_columns(line: &Path) -> Vec<usize> {
    (0..COLUMN_COUNT).filter(|&c| line[c].is_free()).collect()
}

//! The face pool and the ledger of winning combinations already handed out.
//!
//! A [`FaceCatalog`] is the single owner of both for one generation scope
//! (a whole run, or one permutation when the planner resets per permutation).

use crate::core::face_list::load_faces;
use crate::domain::model::{BingoFace, CatalogSize, Combination, Path};
use crate::domain::ports::FaceSource;
use crate::utils::error::{FaceExhaustion, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub const DEFAULT_MAX_RESHUFFLES: u32 = 16;

/// Every combination committed within one scope. A combination is never
/// committed twice.
#[derive(Debug, Default, Clone)]
pub struct PathsTakenLedger {
    taken: HashSet<Combination>,
}

impl PathsTakenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disjoint(&self, combinations: &HashSet<Combination>) -> bool {
        // probe with the smaller side
        if combinations.len() <= self.taken.len() {
            combinations.iter().all(|c| !self.taken.contains(c))
        } else {
            self.taken.iter().all(|c| !combinations.contains(c))
        }
    }

    pub fn insert_all(&mut self, combinations: HashSet<Combination>) {
        for combination in combinations {
            let fresh = self.taken.insert(combination);
            debug_assert!(fresh, "combination {:?} committed twice", combination);
        }
    }

    pub fn contains(&self, combination: &Combination) -> bool {
        self.taken.contains(combination)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}

/// A path pair drawn from one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnPair {
    pub verification_id: String,
    pub first: Path,
    pub second: Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnPath {
    pub verification_id: String,
    pub path: Path,
}

#[derive(Debug)]
pub struct FaceCatalog {
    pool: Vec<BingoFace>,
    ledger: PathsTakenLedger,
    max_reshuffles: u32,
}

impl FaceCatalog {
    /// Reads and parses the face list for `size`, then builds a shuffled catalog.
    pub fn import<F, R>(source: &F, size: CatalogSize, max_reshuffles: u32, rng: &mut R) -> Result<Self>
    where
        F: FaceSource + ?Sized,
        R: Rng + ?Sized,
    {
        let faces = load_faces(source, size)?;
        Ok(Self::from_faces(faces, max_reshuffles, rng))
    }

    /// Builds a catalog with an empty ledger from already parsed faces.
    /// Faces with fewer than two paths are dropped.
    pub fn from_faces<R: Rng + ?Sized>(faces: Vec<BingoFace>, max_reshuffles: u32, rng: &mut R) -> Self {
        let mut pool: Vec<BingoFace> = faces.into_iter().filter(BingoFace::is_drawable).collect();
        pool.shuffle(rng);
        Self {
            pool,
            ledger: PathsTakenLedger::new(),
            max_reshuffles,
        }
    }

    /// Takes two positionally distinct paths from the next face.
    ///
    /// A pair that shares a value in any column is reshuffled in place up to
    /// `max_reshuffles` times before the face is given up as corrupt.
    pub fn draw_pair<R: Rng + ?Sized>(&mut self, rng: &mut R) -> std::result::Result<DrawnPair, FaceExhaustion> {
        let mut face = self.next_face()?;

        let mut reshuffles = 0;
        loop {
            face.paths.shuffle(rng);
            if positionally_distinct(&face.paths[0], &face.paths[1]) {
                break;
            }
            reshuffles += 1;
            tracing::warn!(
                "Face {} drew colliding paths (reshuffle {}/{})",
                face.verification_id,
                reshuffles,
                self.max_reshuffles
            );
            if reshuffles > self.max_reshuffles {
                return Err(FaceExhaustion::corrupt_face(&face.verification_id, self.max_reshuffles));
            }
        }

        let first = face.paths.remove(0);
        let second = face.paths.remove(0);
        let verification_id = face.verification_id.clone();
        self.restore(face, rng);

        Ok(DrawnPair {
            verification_id,
            first,
            second,
        })
    }

    /// Takes one random path from the next face.
    pub fn draw_single<R: Rng + ?Sized>(&mut self, rng: &mut R) -> std::result::Result<DrawnPath, FaceExhaustion> {
        let mut face = self.next_face()?;
        let index = rng.gen_range(0..face.paths.len());
        let path = face.paths.remove(index);
        let verification_id = face.verification_id.clone();
        self.restore(face, rng);

        Ok(DrawnPath {
            verification_id,
            path,
        })
    }

    pub fn is_collision_free(&self, combinations: &HashSet<Combination>) -> bool {
        self.ledger.is_disjoint(combinations)
    }

    /// Records an accepted ticket's combinations. Callers check
    /// [`is_collision_free`](Self::is_collision_free) first.
    pub fn commit(&mut self, combinations: HashSet<Combination>) {
        self.ledger.insert_all(combinations);
    }

    pub fn ledger(&self) -> &PathsTakenLedger {
        &self.ledger
    }

    pub fn remaining_face_count(&self) -> usize {
        self.pool.len()
    }

    pub fn remaining_path_count(&self) -> usize {
        self.pool.iter().map(|face| face.paths.len()).sum()
    }

    fn next_face(&mut self) -> std::result::Result<BingoFace, FaceExhaustion> {
        while let Some(face) = self.pool.pop() {
            if face.is_drawable() {
                return Ok(face);
            }
            tracing::warn!(
                "Discarding face {} with {} paths left in the pool",
                face.verification_id,
                face.paths.len()
            );
        }
        Err(FaceExhaustion::pool_empty())
    }

    /// Puts a face back at a random position while it can still be drawn from.
    fn restore<R: Rng + ?Sized>(&mut self, face: BingoFace, rng: &mut R) {
        if face.is_drawable() {
            let index = rng.gen_range(0..=self.pool.len());
            self.pool.insert(index, face);
        }
    }
}

/// No column holds the same cell in both paths.
pub fn positionally_distinct(first: &Path, second: &Path) -> bool {
    first.iter().zip(second.iter()).all(|(a, b)| a != b)
}

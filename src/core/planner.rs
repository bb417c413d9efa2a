//! Batch orchestration across ticket categories and permutations.
//!
//! Requests run in [`YIELD_TABLE`](crate::core::schedule::YIELD_TABLE) order.
//! Without reset one catalog and ledger serve the whole batch, and each
//! category is produced for every permutation before the next category
//! starts, so no combination repeats anywhere in the run. With reset each
//! permutation gets a fresh catalog and ledger; duplicates can then occur
//! across permutations but never inside one.

use crate::core::catalog::{FaceCatalog, DEFAULT_MAX_RESHUFFLES};
use crate::core::either_or::EitherOrComposer;
use crate::core::expander::CombinationExpander;
use crate::core::free_space::FreeSpaceComposer;
use crate::core::schedule::precedence;
use crate::domain::model::{BingoFace, PseudoFace, TicketCategory};
use crate::utils::error::{BingoError, FaceExhaustion, Result};
use crate::utils::validation::validate_positive_number;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

pub const DEFAULT_MAX_REDRAWS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryLimits {
    /// Reshuffles of one face before a positional collision is fatal.
    pub max_reshuffles: u32,
    /// Draws per ticket before ledger collisions are fatal.
    pub max_redraws: u32,
}

impl Default for RetryLimits {
    fn default() -> Self {
        Self {
            max_reshuffles: DEFAULT_MAX_RESHUFFLES,
            max_redraws: DEFAULT_MAX_REDRAWS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub category: TicketCategory,
    /// Tickets per permutation.
    pub quantity: usize,
}

/// A validated batch: supported categories only, merged and in yield order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    schedule: Vec<CategoryRequest>,
    permutations: u32,
    reset_per_permutation: bool,
    limits: RetryLimits,
}

impl BatchPlan {
    pub fn new(
        requests: Vec<CategoryRequest>,
        permutations: u32,
        reset_per_permutation: bool,
        limits: RetryLimits,
    ) -> Result<Self> {
        validate_positive_number("batch.permutations", permutations as usize, 1)?;

        let mut schedule: Vec<CategoryRequest> = Vec::new();
        for request in requests {
            if precedence(request.category).is_none() {
                return Err(BingoError::InvalidCategoryError {
                    message: request.category.to_string(),
                });
            }
            match schedule.iter_mut().find(|r| r.category == request.category) {
                Some(existing) => existing.quantity += request.quantity,
                None => schedule.push(request),
            }
        }
        schedule.sort_by_key(|request| precedence(request.category));

        Ok(Self {
            schedule,
            permutations,
            reset_per_permutation,
            limits,
        })
    }

    pub fn schedule(&self) -> &[CategoryRequest] {
        &self.schedule
    }

    pub fn permutations(&self) -> u32 {
        self.permutations
    }

    pub fn reset_per_permutation(&self) -> bool {
        self.reset_per_permutation
    }

    pub fn limits(&self) -> RetryLimits {
        self.limits
    }

    pub fn tickets_per_permutation(&self) -> usize {
        self.schedule.iter().map(|r| r.quantity).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedTicket {
    pub category: TicketCategory,
    pub face: PseudoFace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermutationTickets {
    pub permutation: u32,
    pub tickets: Vec<GeneratedTicket>,
}

/// What was left in a catalog when its scope ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub remaining_faces: usize,
    pub remaining_paths: usize,
    pub committed_combinations: usize,
}

impl CatalogStats {
    fn of(catalog: &FaceCatalog) -> Self {
        Self {
            remaining_faces: catalog.remaining_face_count(),
            remaining_paths: catalog.remaining_path_count(),
            committed_combinations: catalog.ledger().len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutput {
    pub permutations: Vec<PermutationTickets>,
    /// One entry per catalog scope: one for a shared run, one per permutation with reset.
    pub catalogs: Vec<CatalogStats>,
}

impl BatchOutput {
    fn with_permutations(count: u32) -> Self {
        Self {
            permutations: (1..=count)
                .map(|permutation| PermutationTickets {
                    permutation,
                    tickets: Vec::new(),
                })
                .collect(),
            catalogs: Vec::new(),
        }
    }

    pub fn ticket_count(&self) -> usize {
        self.permutations.iter().map(|p| p.tickets.len()).sum()
    }
}

/// A batch stopped by exhaustion, with everything accepted before it.
#[derive(Error, Debug)]
#[error("{exhaustion} ({} tickets accepted before abort)", .accepted.ticket_count())]
pub struct BatchAborted {
    pub exhaustion: FaceExhaustion,
    pub accepted: BatchOutput,
}

pub struct TicketBatchPlanner {
    faces: Vec<BingoFace>,
    rng: ChaCha8Rng,
    expander: CombinationExpander,
    free_space: FreeSpaceComposer,
    either_or: EitherOrComposer,
}

impl TicketBatchPlanner {
    /// `faces` is the catalog snapshot every scope starts from.
    pub fn new(faces: Vec<BingoFace>, seed: u64) -> Self {
        Self {
            faces,
            rng: ChaCha8Rng::seed_from_u64(seed),
            expander: CombinationExpander::default(),
            free_space: FreeSpaceComposer::new(),
            either_or: EitherOrComposer::new(DEFAULT_MAX_REDRAWS),
        }
    }

    pub fn run(&mut self, plan: &BatchPlan) -> std::result::Result<BatchOutput, BatchAborted> {
        self.free_space = FreeSpaceComposer::new();
        self.either_or = EitherOrComposer::new(plan.limits().max_redraws);

        info!(
            "🎯 Planning {} categories × {} permutations ({} tickets each, reset: {})",
            plan.schedule().len(),
            plan.permutations(),
            plan.tickets_per_permutation(),
            plan.reset_per_permutation()
        );

        let mut output = BatchOutput::with_permutations(plan.permutations());
        let result = if plan.reset_per_permutation() {
            self.run_with_reset(plan, &mut output)
        } else {
            self.run_shared(plan, &mut output)
        };

        match result {
            Ok(()) => Ok(output),
            Err(exhaustion) => {
                error!(
                    "❌ Batch aborted after {} tickets: {}",
                    output.ticket_count(),
                    exhaustion
                );
                Err(BatchAborted {
                    exhaustion,
                    accepted: output,
                })
            }
        }
    }

    fn run_shared(
        &mut self,
        plan: &BatchPlan,
        output: &mut BatchOutput,
    ) -> std::result::Result<(), FaceExhaustion> {
        let mut catalog = self.fresh_catalog(plan);
        let result = self.fill_interleaved(&mut catalog, plan, &mut output.permutations);
        output.catalogs.push(CatalogStats::of(&catalog));
        result
    }

    fn run_with_reset(
        &mut self,
        plan: &BatchPlan,
        output: &mut BatchOutput,
    ) -> std::result::Result<(), FaceExhaustion> {
        for slot in output.permutations.iter_mut() {
            let mut catalog = self.fresh_catalog(plan);
            let result = self.fill_permutation(&mut catalog, plan, slot);
            output.catalogs.push(CatalogStats::of(&catalog));
            result?;
            info!("✅ Permutation {} complete", slot.permutation);
        }
        Ok(())
    }

    /// Each category in turn, for every permutation, from one shared catalog.
    fn fill_interleaved(
        &mut self,
        catalog: &mut FaceCatalog,
        plan: &BatchPlan,
        slots: &mut [PermutationTickets],
    ) -> std::result::Result<(), FaceExhaustion> {
        for request in plan.schedule() {
            for slot in slots.iter_mut() {
                self.fill(catalog, request, plan, slot)?;
            }
            log_category_done(request, catalog);
        }
        Ok(())
    }

    fn fill_permutation(
        &mut self,
        catalog: &mut FaceCatalog,
        plan: &BatchPlan,
        slot: &mut PermutationTickets,
    ) -> std::result::Result<(), FaceExhaustion> {
        for request in plan.schedule() {
            self.fill(catalog, request, plan, slot)?;
            log_category_done(request, catalog);
        }
        Ok(())
    }

    fn fresh_catalog(&mut self, plan: &BatchPlan) -> FaceCatalog {
        FaceCatalog::from_faces(self.faces.clone(), plan.limits().max_reshuffles, &mut self.rng)
    }

    fn fill(
        &mut self,
        catalog: &mut FaceCatalog,
        request: &CategoryRequest,
        plan: &BatchPlan,
        slot: &mut PermutationTickets,
    ) -> std::result::Result<(), FaceExhaustion> {
        for _ in 0..request.quantity {
            let face = self.generate(catalog, request.category, plan.limits().max_redraws)?;
            slot.tickets.push(GeneratedTicket {
                category: request.category,
                face,
            });
        }
        debug!(
            "Permutation {}: {} × [{}] accepted",
            slot.permutation, request.quantity, request.category
        );
        Ok(())
    }

    fn generate(
        &mut self,
        catalog: &mut FaceCatalog,
        category: TicketCategory,
        max_redraws: u32,
    ) -> std::result::Result<PseudoFace, FaceExhaustion> {
        match category {
            TicketCategory::EitherOr {
                free_spaces,
                either_or,
            } => self
                .either_or
                .generate_one(catalog, free_spaces, either_or, &mut self.rng),
            TicketCategory::SingleLine { .. } | TicketCategory::DoubleLine { .. } => {
                self.generate_line_ticket(catalog, category, max_redraws)
            }
        }
    }

    fn generate_line_ticket(
        &mut self,
        catalog: &mut FaceCatalog,
        category: TicketCategory,
        max_redraws: u32,
    ) -> std::result::Result<PseudoFace, FaceExhaustion> {
        let staggered = matches!(category, TicketCategory::DoubleLine { staggered: true, .. });

        for _ in 0..=max_redraws {
            let (verification_id, lines) = match category {
                TicketCategory::DoubleLine { .. } => {
                    let pair = catalog.draw_pair(&mut self.rng)?;
                    (pair.verification_id, vec![pair.first, pair.second])
                }
                _ => {
                    let drawn = catalog.draw_single(&mut self.rng)?;
                    (drawn.verification_id, vec![drawn.path])
                }
            };

            let Some(face) = self.free_space.compose(
                verification_id,
                lines,
                category.free_spaces(),
                staggered,
                &mut self.rng,
            ) else {
                continue;
            };
            let combinations = self.expander.expand(&face);
            if catalog.is_collision_free(&combinations) {
                catalog.commit(combinations);
                return Ok(face);
            }
            debug!(
                "[{}] draw from face {} collided with the ledger",
                category,
                face.verification_id()
            );
        }

        Err(FaceExhaustion::redraws_exceeded(category, max_redraws))
    }
}

fn log_category_done(request: &CategoryRequest, catalog: &FaceCatalog) {
    info!(
        "✅ [{}] done: {} faces / {} paths left, {} combinations taken",
        request.category,
        catalog.remaining_face_count(),
        catalog.remaining_path_count(),
        catalog.ledger().len()
    );
}

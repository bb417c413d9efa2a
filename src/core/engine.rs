use crate::core::catalog::FaceCatalog;
use crate::core::face_list::load_faces;
use crate::core::planner::{BatchOutput, BatchPlan, TicketBatchPlanner};
use crate::core::schedule::yield_of;
use crate::domain::model::{CatalogSize, TicketCategory};
use crate::domain::ports::FaceSource;
use crate::utils::error::{FaceExhaustion, Result};
use crate::utils::monitor::RunMonitor;
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Everything a run produced, ready for the ticket layer.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub catalog: CatalogSize,
    pub generated_at: DateTime<Utc>,
    pub reset_per_permutation: bool,
    /// Set when the batch stopped early; `output` then holds what was accepted.
    pub failure: Option<FaceExhaustion>,
    pub output: BatchOutput,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledCategory {
    pub category: TicketCategory,
    pub quantity: usize,
    pub theoretical_combinations: u64,
}

/// Catalog and schedule summary for a dry run.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPreview {
    pub catalog: CatalogSize,
    pub faces: usize,
    pub paths: usize,
    pub schedule: Vec<ScheduledCategory>,
}

pub struct GenerationEngine<F: FaceSource> {
    source: F,
    monitor: RunMonitor,
}

impl<F: FaceSource> GenerationEngine<F> {
    pub fn new(source: F) -> Self {
        Self::new_with_monitoring(source, false)
    }

    pub fn new_with_monitoring(source: F, monitor_enabled: bool) -> Self {
        Self {
            source,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub fn run(&self, plan: &BatchPlan, size: CatalogSize, seed: u64) -> Result<RunReport> {
        tracing::info!("🚀 Starting ticket generation (seed {})", seed);

        let faces = load_faces(&self.source, size)?;
        self.monitor.log_phase("Import", faces.len(), "faces");

        let mut planner = TicketBatchPlanner::new(faces, seed);
        let (output, failure) = match planner.run(plan) {
            Ok(output) => (output, None),
            Err(aborted) => (aborted.accepted, Some(aborted.exhaustion)),
        };
        self.monitor
            .log_phase("Generation", output.ticket_count(), "tickets");

        tracing::info!(
            "Generated {} tickets across {} permutations",
            output.ticket_count(),
            output.permutations.len()
        );
        self.monitor.log_final(output.ticket_count());

        Ok(RunReport {
            seed,
            catalog: size,
            generated_at: Utc::now(),
            reset_per_permutation: plan.reset_per_permutation(),
            failure,
            output,
        })
    }

    /// Imports the catalog and reports the schedule without generating.
    pub fn preview(&self, plan: &BatchPlan, size: CatalogSize, seed: u64) -> Result<CatalogPreview> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let catalog = FaceCatalog::import(&self.source, size, plan.limits().max_reshuffles, &mut rng)?;

        let schedule = plan
            .schedule()
            .iter()
            .map(|request| ScheduledCategory {
                category: request.category,
                quantity: request.quantity,
                theoretical_combinations: yield_of(request.category).unwrap_or_default(),
            })
            .collect();

        Ok(CatalogPreview {
            catalog: size,
            faces: catalog.remaining_face_count(),
            paths: catalog.remaining_path_count(),
            schedule,
        })
    }
}

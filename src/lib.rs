pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::{LocalStorage, StoredFaceSource};
pub use config::toml_config::TomlConfig;

pub use core::{
    catalog::FaceCatalog,
    engine::{GenerationEngine, RunReport},
    planner::{BatchAborted, BatchOutput, BatchPlan, CategoryRequest, RetryLimits, TicketBatchPlanner},
};
pub use utils::error::{BingoError, FaceExhaustion, Result};

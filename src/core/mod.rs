pub mod catalog;
pub mod either_or;
pub mod engine;
pub mod expander;
pub mod face_list;
pub mod free_space;
pub mod planner;
pub mod schedule;

pub use crate::domain::model::{BingoFace, Cell, Combination, Path, PseudoFace, Spot, TicketCategory};
pub use crate::domain::ports::{FaceSource, Storage};
pub use crate::utils::error::{FaceExhaustion, Result};

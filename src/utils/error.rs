use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionKind {
    /// No face is left in the pool.
    PoolEmpty,
    /// A face kept yielding positionally colliding path pairs.
    CorruptFace,
    /// No collision-free ticket was found within the redraw budget.
    RedrawsExceeded,
}

/// The only failure the generation core produces. Always fatal to the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Face exhaustion: {reason}")]
pub struct FaceExhaustion {
    pub kind: ExhaustionKind,
    pub reason: String,
}

impl FaceExhaustion {
    pub fn pool_empty() -> Self {
        Self {
            kind: ExhaustionKind::PoolEmpty,
            reason: "no faces remain in the catalog".to_string(),
        }
    }

    pub fn corrupt_face(verification_id: &str, reshuffles: u32) -> Self {
        Self {
            kind: ExhaustionKind::CorruptFace,
            reason: format!(
                "face {} still had positionally colliding paths after {} reshuffles",
                verification_id, reshuffles
            ),
        }
    }

    pub fn redraws_exceeded(category: impl std::fmt::Display, redraws: u32) -> Self {
        Self {
            kind: ExhaustionKind::RedrawsExceeded,
            reason: format!(
                "no collision-free ticket for [{}] after {} redraws",
                category, redraws
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum BingoError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Face list error at row {row}: {message}")]
    FaceListError { row: usize, message: String },

    #[error("Unsupported ticket category: {message}")]
    InvalidCategoryError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error(transparent)]
    Exhausted(#[from] FaceExhaustion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BingoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BingoError::IoError(_) => ErrorCategory::Io,
            BingoError::CsvError(_)
            | BingoError::SerializationError(_)
            | BingoError::FaceListError { .. } => ErrorCategory::Data,
            BingoError::InvalidCategoryError { .. }
            | BingoError::ConfigError { .. }
            | BingoError::ConfigValidationError { .. }
            | BingoError::InvalidConfigValueError { .. }
            | BingoError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BingoError::Exhausted(_) => ErrorCategory::Generation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Generation => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BingoError::IoError(_) => "Check that the face list and output paths exist and are accessible",
            BingoError::CsvError(_) | BingoError::FaceListError { .. } => {
                "Check the face list format: \"<faceId>.<line>\" followed by five column values"
            }
            BingoError::SerializationError(_) => "Check the output directory and available disk space",
            BingoError::InvalidCategoryError { .. } => {
                "Use 1 or 2 lines, at most 3 free spaces, and at most 5 free plus either-or spots"
            }
            BingoError::ConfigError { .. }
            | BingoError::ConfigValidationError { .. }
            | BingoError::InvalidConfigValueError { .. }
            | BingoError::MissingConfigError { .. } => "Review the batch plan file against batch-plan.toml",
            BingoError::Exhausted(e) => match e.kind {
                ExhaustionKind::CorruptFace => "Inspect the named face in the source catalog",
                _ => "Use the extended catalog, enable reset per permutation, or lower quantities",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BingoError::Exhausted(e) => format!("Ran out of usable bingo faces: {}", e.reason),
            BingoError::FaceListError { row, message } => {
                format!("The face list is malformed (row {}): {}", row, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BingoError>;

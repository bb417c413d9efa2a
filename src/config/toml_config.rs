use crate::config::cli::{LocalStorage, StoredFaceSource};
use crate::core::catalog::DEFAULT_MAX_RESHUFFLES;
use crate::core::planner::{BatchPlan, CategoryRequest, RetryLimits, DEFAULT_MAX_REDRAWS};
use crate::core::schedule::precedence;
use crate::domain::model::{CatalogSize, TicketCategory, COLUMN_COUNT};
use crate::utils::error::{BingoError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const FACE_LIST_EXTENSIONS: [&str; 2] = ["csv", "txt"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batch: BatchConfig,
    pub catalog: CatalogConfig,
    pub retry: Option<RetryConfig>,
    pub output: Option<OutputConfig>,
    pub monitoring: Option<MonitoringConfig>,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub name: String,
    pub description: Option<String>,
    pub permutations: u32,
    pub reset_per_permutation: Option<bool>,
    pub seed: Option<u64>,
    pub extended: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_dir: Option<String>,
    pub standard_path: String,
    pub extended_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_reshuffles: Option<u32>,
    pub max_redraws: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
    pub filename: Option<String>,
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub lines: u8,
    pub staggered: Option<bool>,
    pub free_spaces: Option<u8>,
    pub either_or: Option<u8>,
    /// Tickets per permutation
    pub quantity: usize,
}

impl CategoryConfig {
    pub fn category(&self) -> Option<TicketCategory> {
        TicketCategory::from_parts(
            self.lines,
            self.staggered.unwrap_or(false),
            self.free_spaces.unwrap_or(0),
            self.either_or.unwrap_or(0),
        )
    }
}

impl TomlConfig {
    /// Loads a batch plan from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BingoError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BingoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown names are kept.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BingoError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("batch.name", &self.batch.name)?;
        validate_positive_number("batch.permutations", self.batch.permutations as usize, 1)?;

        validate_path("catalog.standard_path", &self.catalog.standard_path)?;
        validate_file_extensions(
            "catalog.standard_path",
            std::slice::from_ref(&self.catalog.standard_path),
            &FACE_LIST_EXTENSIONS,
        )?;
        if self.catalog_size() == CatalogSize::Extended {
            let extended = validate_required_field("catalog.extended_path", &self.catalog.extended_path)?;
            validate_path("catalog.extended_path", extended)?;
            validate_file_extensions(
                "catalog.extended_path",
                std::slice::from_ref(extended),
                &FACE_LIST_EXTENSIONS,
            )?;
        }

        if let Some(output) = &self.output {
            validate_path("output.directory", &output.directory)?;
        }

        if self.categories.is_empty() {
            return Err(BingoError::MissingConfigError {
                field: "categories".to_string(),
            });
        }
        for (index, entry) in self.categories.iter().enumerate() {
            let field = format!("categories[{}]", index);
            validate_range(&format!("{}.lines", field), entry.lines, 1, 2)?;
            let free = entry.free_spaces.unwrap_or(0);
            let either_or = entry.either_or.unwrap_or(0);
            validate_range(&format!("{}.free_spaces", field), free, 0, 3)?;
            validate_range(
                &format!("{}.either_or", field),
                either_or as usize + free as usize,
                0,
                COLUMN_COUNT,
            )?;
            validate_positive_number(&format!("{}.quantity", field), entry.quantity, 1)?;

            match entry.category() {
                Some(category) if precedence(category).is_some() => {}
                _ => {
                    return Err(BingoError::ConfigValidationError {
                        field,
                        message: format!(
                            "no supported ticket category for {} lines, {} free, {} either-or",
                            entry.lines, free, either_or
                        ),
                    })
                }
            }
        }

        Ok(())
    }

    pub fn catalog_size(&self) -> CatalogSize {
        CatalogSize::from_extended(self.batch.extended.unwrap_or(false))
    }

    pub fn reset_per_permutation(&self) -> bool {
        self.batch.reset_per_permutation.unwrap_or(false)
    }

    pub fn retry_limits(&self) -> RetryLimits {
        let retry = self.retry.as_ref();
        RetryLimits {
            max_reshuffles: retry
                .and_then(|r| r.max_reshuffles)
                .unwrap_or(DEFAULT_MAX_RESHUFFLES),
            max_redraws: retry
                .and_then(|r| r.max_redraws)
                .unwrap_or(DEFAULT_MAX_REDRAWS),
        }
    }

    pub fn output_directory(&self) -> &str {
        self.output
            .as_ref()
            .map(|o| o.directory.as_str())
            .unwrap_or("./output")
    }

    pub fn output_filename(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.filename.as_deref())
            .unwrap_or("tickets.json")
    }

    pub fn pretty_output(&self) -> bool {
        self.output.as_ref().and_then(|o| o.pretty).unwrap_or(true)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn to_batch_plan(&self) -> Result<BatchPlan> {
        let requests = self
            .categories
            .iter()
            .map(|entry| {
                entry
                    .category()
                    .map(|category| CategoryRequest {
                        category,
                        quantity: entry.quantity,
                    })
                    .ok_or_else(|| BingoError::InvalidCategoryError {
                        message: format!("{} lines with {:?} either-or", entry.lines, entry.either_or),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        BatchPlan::new(
            requests,
            self.batch.permutations,
            self.reset_per_permutation(),
            self.retry_limits(),
        )
    }

    pub fn face_source(&self) -> StoredFaceSource<LocalStorage> {
        let base_dir = self.catalog.base_dir.clone().unwrap_or_else(|| ".".to_string());
        StoredFaceSource::new(
            LocalStorage::new(base_dir),
            self.catalog.standard_path.clone(),
            self.catalog.extended_path.clone(),
        )
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

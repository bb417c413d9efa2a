use crate::domain::model::CatalogSize;
use crate::domain::ports::{FaceSource, Storage};
use crate::utils::error::{BingoError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// Face lists kept as files in a [`Storage`], one per catalog size.
#[derive(Debug, Clone)]
pub struct StoredFaceSource<S: Storage> {
    storage: S,
    standard_file: String,
    extended_file: Option<String>,
}

impl<S: Storage> StoredFaceSource<S> {
    pub fn new(storage: S, standard_file: String, extended_file: Option<String>) -> Self {
        Self {
            storage,
            standard_file,
            extended_file,
        }
    }
}

impl<S: Storage> FaceSource for StoredFaceSource<S> {
    fn read_face_list(&self, size: CatalogSize) -> Result<String> {
        let file = match size {
            CatalogSize::Standard => &self.standard_file,
            CatalogSize::Extended => {
                self.extended_file
                    .as_ref()
                    .ok_or_else(|| BingoError::MissingConfigError {
                        field: "catalog.extended_path".to_string(),
                    })?
            }
        };
        tracing::debug!("Reading {} face list from {}", size, file);

        let bytes = self.storage.read_file(file)?;
        String::from_utf8(bytes).map_err(|e| BingoError::FaceListError {
            row: 0,
            message: format!("{} is not valid UTF-8: {}", file, e),
        })
    }
}

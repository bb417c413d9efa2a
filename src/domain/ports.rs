use crate::domain::model::CatalogSize;
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Supplies the raw face-list text for a catalog size.
pub trait FaceSource {
    fn read_face_list(&self, size: CatalogSize) -> Result<String>;
}

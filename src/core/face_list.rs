//! Parsing of the flat face-list source.
//!
//! Each row is `"<faceId>.<lineIndex>", B, I, N, G, O`. Consecutive rows that
//! share a face id form one [`BingoFace`]; an empty cell is a pre-marked free
//! space. Faces with fewer than two lines are dropped since nothing can be
//! drawn from them.

use crate::domain::model::{BingoFace, Cell, Column, Path, CatalogSize, COLUMN_COUNT};
use crate::domain::ports::FaceSource;
use crate::utils::error::{BingoError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

pub fn load_faces<F: FaceSource + ?Sized>(source: &F, size: CatalogSize) -> Result<Vec<BingoFace>> {
    let text = source.read_face_list(size)?;
    let faces = parse_face_list(&text)?;
    tracing::info!(
        "📥 Loaded {} drawable faces from the {} catalog",
        faces.len(),
        size
    );
    Ok(faces)
}

pub fn parse_face_list(text: &str) -> Result<Vec<BingoFace>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut faces: Vec<BingoFace> = Vec::new();
    let mut current: Option<BingoFace> = None;

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != COLUMN_COUNT + 1 {
            return Err(BingoError::FaceListError {
                row,
                message: format!(
                    "expected {} fields, found {}",
                    COLUMN_COUNT + 1,
                    record.len()
                ),
            });
        }

        let face_id = parse_face_id(&record[0], row)?;
        let path = parse_path(&record, row)?;

        match current.as_mut() {
            Some(face) if face.verification_id == face_id => face.paths.push(path),
            _ => {
                if let Some(finished) = current.replace(BingoFace::new(face_id, vec![path])) {
                    faces.push(finished);
                }
            }
        }
    }
    if let Some(finished) = current.take() {
        faces.push(finished);
    }

    let imported = faces.len();
    faces.retain(BingoFace::is_drawable);
    if faces.len() < imported {
        tracing::debug!(
            "Dropped {} faces with fewer than two lines",
            imported - faces.len()
        );
    }

    Ok(faces)
}

fn parse_face_id(raw: &str, row: usize) -> Result<String> {
    let id = raw.rsplit_once('.').map(|(id, _)| id).unwrap_or(raw);
    if id.is_empty() {
        return Err(BingoError::FaceListError {
            row,
            message: format!("missing face id in '{}'", raw),
        });
    }
    Ok(id.to_string())
}

fn parse_path(record: &StringRecord, row: usize) -> Result<Path> {
    let mut path = [Cell::Free; COLUMN_COUNT];
    for (column, cell) in Column::ALL.into_iter().zip(path.iter_mut()) {
        let raw = &record[column.index() + 1];
        if raw.is_empty() {
            continue;
        }
        let number: u8 = raw.parse().map_err(|_| BingoError::FaceListError {
            row,
            message: format!("'{}' in column {} is not a number", raw, column),
        })?;
        if !column.contains(number) {
            return Err(BingoError::FaceListError {
                row,
                message: format!(
                    "{} is outside column {} ({:?})",
                    number,
                    column,
                    column.domain()
                ),
            });
        }
        *cell = Cell::Number(number);
    }
    Ok(path)
}

mod common;

use bingo_faces::domain::model::CatalogSize;
use bingo_faces::domain::ports::Storage;
use bingo_faces::utils::validation::Validate;
use bingo_faces::{GenerationEngine, LocalStorage, TomlConfig};
use common::{face_list_csv, synthetic_faces};
use tempfile::TempDir;

fn plan_toml(base_dir: &str, extra: &str) -> String {
    format!(
        r#"
[batch]
name = "integration"
permutations = 2
seed = 11
{extra}

[catalog]
base_dir = "{base_dir}"
standard_path = "faces/standard.csv"

[output]
directory = "{base_dir}/out"
pretty = false

[[categories]]
lines = 2
staggered = true
free_spaces = 1
quantity = 3

[[categories]]
lines = 1
quantity = 5

[[categories]]
lines = 1
free_spaces = 1
either_or = 2
quantity = 2
"#
    )
}

fn workspace() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let base = dir.path().to_str().unwrap().replace('\\', "/");
    let storage = LocalStorage::new(base.clone());
    storage
        .write_file(
            "faces/standard.csv",
            face_list_csv(&synthetic_faces(120, 4, 51)).as_bytes(),
        )
        .unwrap();
    (dir, base)
}

#[test]
fn test_plan_file_end_to_end() {
    let (_dir, base) = workspace();
    let config = TomlConfig::from_toml_str(&plan_toml(&base, "")).unwrap();
    config.validate().unwrap();

    let plan = config.to_batch_plan().unwrap();
    let engine = GenerationEngine::new(config.face_source());
    let report = engine
        .run(&plan, config.catalog_size(), config.batch.seed.unwrap())
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.catalog, CatalogSize::Standard);
    assert_eq!(report.output.ticket_count(), 2 * (3 + 5 + 2));

    let storage = LocalStorage::new(config.output_directory().to_string());
    storage
        .write_file(config.output_filename(), &serde_json::to_vec(&report).unwrap())
        .unwrap();

    let written = storage.read_file("tickets.json").unwrap();
    let json: serde_json::Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(json["seed"], 11);
    assert!(json["failure"].is_null());

    let first = &json["output"]["permutations"][0]["tickets"][0];
    assert_eq!(first["category"]["kind"], "double_line");
    // [verification_id, rows]
    let record = first["face"].as_array().unwrap();
    assert!(record[0].is_string());
    assert_eq!(record[1].as_array().unwrap().len(), 2);
}

#[test]
fn test_same_plan_and_seed_reproduce_the_batch() {
    let (_dir, base) = workspace();
    let config = TomlConfig::from_toml_str(&plan_toml(&base, "")).unwrap();
    let plan = config.to_batch_plan().unwrap();
    let engine = GenerationEngine::new(config.face_source());

    let first = engine.run(&plan, CatalogSize::Standard, 11).unwrap();
    let second = engine.run(&plan, CatalogSize::Standard, 11).unwrap();
    assert_eq!(first.output, second.output);
}

#[test]
fn test_preview_reads_the_catalog() {
    let (_dir, base) = workspace();
    let config = TomlConfig::from_toml_str(&plan_toml(&base, "")).unwrap();
    let plan = config.to_batch_plan().unwrap();

    let preview = GenerationEngine::new(config.face_source())
        .preview(&plan, config.catalog_size(), 1)
        .unwrap();
    assert_eq!(preview.faces, 120);
    assert_eq!(preview.paths, 480);
    assert_eq!(preview.schedule.len(), 3);
    assert_eq!(preview.schedule[0].theoretical_combinations, 240);
}

#[test]
fn test_extended_plan_without_extended_list_fails_validation() {
    let (_dir, base) = workspace();
    let config = TomlConfig::from_toml_str(&plan_toml(&base, "extended = true")).unwrap();
    assert!(config.validate().is_err());
}

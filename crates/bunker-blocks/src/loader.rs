use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use bunker_core::block::BlockDefinition;
use bunker_core::mod_manifest::ModManifest;
use bunker_core::ore::OreConfig;
use thiserror::Error;

use crate::registry::BlockRegistry;
use crate::sources::{self, DataSources};
use crate::validator::{self, ValidationError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse block definitions RON: {0}")]
    BlockParseError(String),
    #[error("Failed to parse ore configs RON: {0}")]
    OreParseError(String),
    #[error("Failed to parse mod manifest RON: {0}")]
    ManifestParseError(String),
    #[error("Data directory not found: {0}")]
    MissingDataDir(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parse a RON list of block definitions.
pub fn load_blocks_from_str(ron_str: &str) -> Result<Vec<BlockDefinition>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::BlockParseError(e.to_string()))
}

/// Parse a RON list of ore configs.
pub fn load_ores_from_str(ron_str: &str) -> Result<Vec<OreConfig>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::OreParseError(e.to_string()))
}

/// Parse a mod manifest from a RON string.
pub fn load_mod_manifest(ron_str: &str) -> Result<ModManifest, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::ManifestParseError(e.to_string()))
}

/// A kind of record loaded with the base-then-mods merge rules.
pub trait RecordKind {
    type Record;

    /// Used in log lines.
    const LABEL: &'static str;

    fn parse(src: &str) -> Result<Vec<Self::Record>, LoadError>;

    fn record_id(record: &Self::Record) -> &str;

    fn validate(record: &mut Self::Record) -> Result<(), Vec<ValidationError>>;
}

pub struct Blocks;

impl RecordKind for Blocks {
    type Record = BlockDefinition;
    const LABEL: &'static str = "block";

    fn parse(src: &str) -> Result<Vec<BlockDefinition>, LoadError> {
        load_blocks_from_str(src)
    }

    fn record_id(record: &BlockDefinition) -> &str {
        &record.id
    }

    fn validate(record: &mut BlockDefinition) -> Result<(), Vec<ValidationError>> {
        validator::validate_block(record)
    }
}

pub struct Ores;

impl RecordKind for Ores {
    type Record = OreConfig;
    const LABEL: &'static str = "ore";

    fn parse(src: &str) -> Result<Vec<OreConfig>, LoadError> {
        load_ores_from_str(src)
    }

    fn record_id(record: &OreConfig) -> &str {
        &record.ore_block_id
    }

    fn validate(record: &mut OreConfig) -> Result<(), Vec<ValidationError>> {
        validator::validate_ore(record)
    }
}

/// Merge named sources in order. Malformed sources and invalid records are
/// logged and skipped; the first record seen for an id wins.
pub fn merge_sources<K: RecordKind>(sources: &[(&str, &str)]) -> Vec<K::Record> {
    let mut merged = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (name, src) in sources {
        let records = match K::parse(src) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Skipping {} file {}: {}", K::LABEL, name, e);
                continue;
            }
        };

        for mut record in records {
            if let Err(errors) = K::validate(&mut record) {
                for e in errors {
                    log::warn!("{}: invalid {} record: {}", name, K::LABEL, e);
                }
                continue;
            }
            let id = K::record_id(&record).to_string();
            if !seen.insert(id.clone()) {
                log::warn!("{}: duplicate {} id '{}', keeping first", name, K::LABEL, id);
                continue;
            }
            merged.push(record);
        }
    }

    merged
}

/// Read files and merge them with [`merge_sources`]. Unreadable files are
/// logged and skipped.
pub fn load_files<K: RecordKind>(files: &[PathBuf]) -> Vec<K::Record> {
    let mut contents = Vec::with_capacity(files.len());
    for path in files {
        match fs::read_to_string(path) {
            Ok(src) => contents.push((path.display().to_string(), src)),
            Err(e) => log::warn!("Skipping {} file {}: {}", K::LABEL, path.display(), e),
        }
    }
    let borrowed: Vec<(&str, &str)> = contents
        .iter()
        .map(|(name, src)| (name.as_str(), src.as_str()))
        .collect();
    merge_sources::<K>(&borrowed)
}

/// Everything loaded from one data root.
#[derive(Debug, Clone)]
pub struct GameData {
    pub registry: BlockRegistry,
    /// In application order: base files first, then mods.
    pub ore_configs: Vec<OreConfig>,
    pub mods: Vec<ModManifest>,
}

impl GameData {
    /// Build from already merged records. Ores that reference unknown blocks
    /// are logged and dropped.
    pub fn from_records(blocks: Vec<BlockDefinition>, ores: Vec<OreConfig>, mods: Vec<ModManifest>) -> Self {
        let registry = BlockRegistry::from_definitions(blocks);
        let mut ore_configs = Vec::with_capacity(ores.len());
        for ore in ores {
            let errors = validator::validate_ore_references(std::slice::from_ref(&ore), &registry);
            if errors.is_empty() {
                ore_configs.push(ore);
            } else {
                for e in errors {
                    log::warn!("Dropping ore config: {}", e);
                }
            }
        }
        Self {
            registry,
            ore_configs,
            mods,
        }
    }
}

/// Load block definitions and ore configs from a data root, merging base
/// files with every mod.
pub fn load_data_dir(root: &Path) -> Result<GameData, LoadError> {
    let sources: DataSources = sources::discover(root)?;

    let blocks = load_files::<Blocks>(&sources.all_block_files());
    let ores = load_files::<Ores>(&sources.all_ore_files());
    let mods = sources.mods.iter().map(|m| m.manifest.clone()).collect();

    log::info!(
        "Loaded {} block definitions and {} ore configs from {}",
        blocks.len(),
        ores.len(),
        root.display()
    );

    Ok(GameData::from_records(blocks, ores, mods))
}

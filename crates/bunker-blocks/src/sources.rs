//! Discovery of data files on disk.
//!
//! Layout under a data root:
//!
//! ```text
//! blocks/*.ron            base block definitions
//! ores/*.ron              base ore configs
//! mods/<name>/mod.ron     optional manifest
//! mods/<name>/**/*block*.ron
//! mods/<name>/**/*ore*.ron
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use bunker_core::mod_manifest::ModManifest;

use crate::loader::{load_mod_manifest, LoadError};

pub const BLOCKS_DIR: &str = "blocks";
pub const ORES_DIR: &str = "ores";
pub const MODS_DIR: &str = "mods";
pub const MANIFEST_FILE: &str = "mod.ron";

pub const BASE_PATTERN: &str = "*.ron";
pub const MOD_BLOCK_PATTERN: &str = "*block*.ron";
pub const MOD_ORE_PATTERN: &str = "*ore*.ron";

/// Files contributed by one mod directory.
#[derive(Debug, Clone)]
pub struct ModSource {
    pub dir: PathBuf,
    pub manifest: ModManifest,
    pub block_files: Vec<PathBuf>,
    pub ore_files: Vec<PathBuf>,
}

/// Every data file to load, in load order.
#[derive(Debug, Clone, Default)]
pub struct DataSources {
    pub block_files: Vec<PathBuf>,
    pub ore_files: Vec<PathBuf>,
    pub mods: Vec<ModSource>,
}

impl DataSources {
    /// Block files: base first, then each mod in load order.
    pub fn all_block_files(&self) -> Vec<PathBuf> {
        let mut files = self.block_files.clone();
        for m in &self.mods {
            files.extend(m.block_files.iter().cloned());
        }
        files
    }

    /// Ore files: base first, then each mod in load order.
    pub fn all_ore_files(&self) -> Vec<PathBuf> {
        let mut files = self.ore_files.clone();
        for m in &self.mods {
            files.extend(m.ore_files.iter().cloned());
        }
        files
    }
}

/// Scan a data root. A missing root is an error; missing sub-directories
/// simply contribute nothing.
pub fn discover(root: &Path) -> Result<DataSources, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::MissingDataDir(root.display().to_string()));
    }

    let block_files = collect_files(&root.join(BLOCKS_DIR), BASE_PATTERN, false);
    let ore_files = collect_files(&root.join(ORES_DIR), BASE_PATTERN, false);

    let mut mods = Vec::new();
    let mods_dir = root.join(MODS_DIR);
    for dir in list_subdirs(&mods_dir) {
        let manifest = read_manifest(&dir);
        let block_files = collect_files(&dir, MOD_BLOCK_PATTERN, true);
        let ore_files = collect_files(&dir, MOD_ORE_PATTERN, true);
        mods.push(ModSource {
            dir,
            manifest,
            block_files,
            ore_files,
        });
    }
    mods.sort_by(|a, b| {
        a.manifest
            .load_order_hint
            .cmp(&b.manifest.load_order_hint)
            .then_with(|| a.dir.file_name().cmp(&b.dir.file_name()))
    });

    log::info!(
        "Discovered {} base block files, {} base ore files, {} mods under {}",
        block_files.len(),
        ore_files.len(),
        mods.len(),
        root.display()
    );

    Ok(DataSources {
        block_files,
        ore_files,
        mods,
    })
}

fn read_manifest(dir: &Path) -> ModManifest {
    let path = dir.join(MANIFEST_FILE);
    let fallback = || ModManifest {
        name: dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..ModManifest::default()
    };

    let Ok(src) = fs::read_to_string(&path) else {
        return fallback();
    };
    match load_mod_manifest(&src) {
        Ok(mut manifest) => {
            if manifest.name.is_empty() {
                manifest.name = fallback().name;
            }
            manifest
        }
        Err(e) => {
            log::warn!("Skipping manifest {}: {}", path.display(), e);
            fallback()
        }
    }
}

fn list_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Files in `dir` whose name matches `pattern`, sorted by path.
fn collect_files(dir: &Path, pattern: &str, recursive: bool) -> Vec<PathBuf> {
    let mut out = Vec::new();
    collect_into(dir, pattern, recursive, &mut out);
    out.sort();
    out
}

fn collect_into(dir: &Path, pattern: &str, recursive: bool, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_into(&path, pattern, recursive, out);
            }
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == MANIFEST_FILE {
            continue;
        }
        if wildcard_match(&name, pattern) {
            out.push(path);
        }
    }
}

/// Match `name` against a pattern where `*` matches any run of characters.
pub fn wildcard_match(name: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return name == pattern;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !name.starts_with(first) || name.len() < first.len() + last.len() {
        return false;
    }
    if !name[first.len()..].ends_with(last) {
        return false;
    }

    let mut rest = &name[first.len()..name.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    true
}

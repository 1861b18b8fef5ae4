//! # File I/O Module
//!
//! Saves and loads [`ProblemDefinition`] files:
//! - **Atomic saves**: write to `.tmp`, verify by re-parsing, rename over the target
//! - **File locking**: an exclusive OS lock on a `.lock` sidecar for the duration of a save
//! - **Version validation**: reject definitions written by an incompatible schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use wb_core::definition::ProblemDefinition;
//! use wb_core::file_io::{load_definition, save_definition};
//! use wb_core::units::UnitSystem;
//!
//! let def = ProblemDefinition::new("wb", UnitSystem::English);
//! save_definition(&def, Path::new("wb.json"))?;
//!
//! let loaded = load_definition(Path::new("wb.json"))?;
//! assert_eq!(loaded.name, "wb");
//! # Ok::<(), wb_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use tracing::debug;

use crate::definition::{ProblemDefinition, SCHEMA_VERSION};
use crate::errors::{CalcError, CalcResult};

/// Exclusive lock on a definition file, released when dropped.
pub struct DefinitionLock {
    lock_path: PathBuf,
    _lock_file: File,
}

impl DefinitionLock {
    /// Take the lock without blocking.
    ///
    /// Fails with [`CalcError::FileLocked`] when another process holds it.
    pub fn acquire(path: &Path) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process"))?;

        // Lock contents are informational only
        lock_file
            .set_len(0)
            .and_then(|_| writeln!(lock_file, "pid {}", std::process::id()))
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(DefinitionLock {
            lock_path,
            _lock_file: lock_file,
        })
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for DefinitionLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Lock file path for a definition file (`wb.json` -> `wb.json.lock`)
fn lock_path_for(path: &Path) -> PathBuf {
    let mut lock_path = path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Temp file path used during an atomic save (`wb.json` -> `wb.json.tmp`)
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp_path = path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

/// Save a definition with atomic write semantics.
///
/// The `modified` timestamp of the written copy is set to now; the caller's
/// value is not changed.
pub fn save_definition(definition: &ProblemDefinition, path: &Path) -> CalcResult<()> {
    let _lock = DefinitionLock::acquire(path)?;

    let mut stamped = definition.clone();
    stamped.modified = Some(Utc::now());
    let json = serde_json::to_string_pretty(&stamped).map_err(|e| CalcError::serialization(e.to_string()))?;

    let tmp_path = tmp_path_for(path);
    let result = write_and_verify(&tmp_path, &json).and_then(|_| {
        fs::rename(&tmp_path, path)
            .map_err(|e| CalcError::file_error("rename to final", path.display().to_string(), e.to_string()))
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    debug!(path = %path.display(), "saved problem definition");
    Ok(())
}

fn write_and_verify(tmp_path: &Path, json: &str) -> CalcResult<()> {
    let mut tmp_file = File::create(tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    let written = fs::read_to_string(tmp_path)
        .map_err(|e| CalcError::file_error("verify temp file", tmp_path.display().to_string(), e.to_string()))?;
    ProblemDefinition::from_json(&written)?;
    Ok(())
}

/// Load a definition from a file.
///
/// # Returns
///
/// * `Ok(ProblemDefinition)` - Successfully loaded definition
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::InvalidArgument)` - Components or fuel cases have the wrong shape
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_definition(path: &Path) -> CalcResult<ProblemDefinition> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let definition = ProblemDefinition::from_json(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => {
            CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), reason))
        }
        other => other,
    })?;

    validate_version(&definition.version)?;
    debug!(path = %path.display(), name = %definition.name, "loaded problem definition");
    Ok(definition)
}

/// Validate that a file version is compatible with the current schema.
///
/// Major versions must match; under 0.x a newer minor version is rejected.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}

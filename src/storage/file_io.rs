//! File I/O utilities with atomic writes
//!
//! Whole-file writes go to a sibling temp file that is synced and renamed
//! over the target, so a crash leaves either the old file or the new one.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CheckbookError, CheckbookResult};

/// Sibling temp path used while a file is being rewritten (`name.csv.tmp`)
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a file atomically using `write` to produce its contents
pub fn write_atomic<P, F>(path: P, write: F) -> CheckbookResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> CheckbookResult<()>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CheckbookError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);
    let file = File::create(&temp_path).map_err(|e| {
        CheckbookError::Storage(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    let mut writer = BufWriter::new(file);
    let written = write(&mut writer)
        .and_then(|_| {
            writer
                .flush()
                .map_err(|e| CheckbookError::Storage(format!("Failed to flush data: {}", e)))
        })
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| CheckbookError::Storage(format!("Failed to sync data: {}", e)))
        });

    if let Err(err) = written {
        drop(writer);
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    drop(writer);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CheckbookError::Storage(format!("Failed to replace {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> CheckbookResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| CheckbookError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Read JSON from a file that must exist
pub fn read_json<T, P>(path: P) -> CheckbookResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| CheckbookError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| CheckbookError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

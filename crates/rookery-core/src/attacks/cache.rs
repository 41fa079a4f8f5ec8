//! On-disk snapshot of the attack tables.
//!
//! The snapshot is JSON. A missing file means "build from scratch"; a file
//! that exists but cannot be decoded or has the wrong shape is an error.

use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use super::AttackTables;
use crate::error::CacheError;

/// Read a snapshot from `path`. Returns `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<AttackTables>, CacheError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let tables: AttackTables = serde_json::from_reader(BufReader::new(file))?;
    tables.validate()?;
    info!(path = %path.display(), "loaded attack tables from cache");
    Ok(Some(tables))
}

/// Write a snapshot of `tables` to `path`, replacing any existing file.
pub fn save(tables: &AttackTables, path: &Path) -> Result<(), CacheError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer(&mut writer, tables)?;
    writer.flush()?;
    info!(path = %path.display(), "saved attack tables to cache");
    Ok(())
}

/// Load the snapshot at `path`, or build the tables and try to write one.
///
/// A failed write is logged and otherwise ignored: the freshly built
/// tables are returned either way.
pub fn load_or_build(path: &Path) -> Result<AttackTables, CacheError> {
    if let Some(tables) = load(path)? {
        return Ok(tables);
    }
    info!(path = %path.display(), "no attack cache found, rebuilding");
    let tables = AttackTables::build();
    if let Err(e) = save(&tables, path) {
        warn!(error = %e, path = %path.display(), "could not write attack cache");
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{load, load_or_build, save};
    use crate::attacks::AttackTables;
    use crate::error::CacheError;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rookery-unit-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = scratch("missing.json");
        let _ = std::fs::remove_file(&path);
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let path = scratch("garbage.json");
        std::fs::write(&path, b"not json at all").unwrap();
        assert!(matches!(load(&path), Err(CacheError::Decode { .. })));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_is_identical() {
        let path = scratch("roundtrip.json");
        let built = AttackTables::build();
        save(&built, &path).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert!(loaded == built, "cached tables differ from built tables");

        let again = load_or_build(&path).unwrap();
        assert!(again == built);
        let _ = std::fs::remove_file(&path);
    }
}

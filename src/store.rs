use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::models::ProductSnapshot;

/// Persists the latest snapshot to a flat file. Single record, no history:
/// every save fully overwrites the previous contents, so external tooling
/// can read the file between cycles and always sees one snapshot.
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, snapshot: &ProductSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    pub fn load(&self) -> Result<ProductSnapshot> {
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

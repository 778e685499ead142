use std::path::Path;

use tracing::debug;

use crate::error::{DevtaskError, Result};

/// Read `KEY=VALUE` pairs from a dotenv file. A missing file yields no pairs.
///
/// The pairs are handed to the executor rather than exported into this
/// process, so nothing else observes them.
pub fn load_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    if !path.exists() {
        debug!(path = %path.display(), "env file not found, skipping");
        return Ok(Vec::new());
    }

    let wrap = |source: dotenvy::Error| DevtaskError::EnvFile {
        path: path.display().to_string(),
        source,
    };
    let mut pairs = Vec::new();
    for item in dotenvy::from_path_iter(path).map_err(wrap)? {
        pairs.push(item.map_err(wrap)?);
    }
    debug!(path = %path.display(), count = pairs.len(), "loaded env file");
    Ok(pairs)
}

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{debug, warn};

use crate::error::{Result, ToolError};
use crate::model::GroupId;

/// A workbook found on disk and the group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSource {
    pub path: PathBuf,
    pub group: GroupId,
}

/// Recursively lists the `.xlsx` workbooks under `dir`, skipping Office lock
/// files (`~...`) and `exclude` (normally the report being generated).
///
/// Paths are returned in lexicographic order.
pub fn discover_sources(dir: &Path, exclude: Option<&Path>) -> Result<Vec<DiscoveredSource>> {
    if !dir.is_dir() {
        return Err(ToolError::MissingInput(dir.to_path_buf()));
    }

    let excluded = exclude.and_then(|path| path.canonicalize().ok());
    let pattern = format!("{}/**/[!~]*.xlsx", glob::Pattern::escape(&dir.to_string_lossy()));

    let mut paths = Vec::new();
    for entry in glob(&pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(error) => {
                warn!(%error, "skipping unreadable path");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if excluded.is_some() && path.canonicalize().ok() == excluded {
            debug!(path = %path.display(), "skipping output workbook");
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| DiscoveredSource {
            group: group_id(&path),
            path,
        })
        .collect())
}

/// Derives a group identifier from the file name without its extension.
pub fn group_id(path: &Path) -> GroupId {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
